use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP daemon. Imports the seed dataset on first run.
    Daemon {},

    /// Add a new recipe
    Add {
        /// Recipe title
        #[clap(short, long)]
        title: String,

        /// Recipe description
        #[clap(short, long)]
        description: Option<String>,

        /// Cuisine (e.g. "Italian")
        #[clap(short, long)]
        cuisine: Option<String>,

        /// Difficulty (free text, e.g. "easy")
        #[clap(long)]
        difficulty: Option<String>,

        /// Cook time in minutes
        #[clap(long)]
        cook_time: Option<u32>,

        /// Comma-separated diet tags
        #[clap(long)]
        diet_tags: Option<String>,

        /// Comma-separated ingredient names
        #[clap(short, long)]
        ingredients: Option<String>,

        /// Newline-delimited preparation steps
        #[clap(short, long)]
        steps: Option<String>,
    },

    /// Search recipes by ingredient filters
    Search {
        /// Comma-separated ingredients every result must contain
        #[clap(short, long)]
        include: Option<String>,

        /// Comma-separated ingredients no result may contain
        #[clap(short = 'x', long)]
        exclude: Option<String>,

        /// Exact cuisine match
        #[clap(short, long)]
        cuisine: Option<String>,

        /// Diet tag the recipe must carry
        #[clap(long)]
        diet_tag: Option<String>,

        /// Print only the number of matches
        #[clap(long, default_value = "false")]
        count: bool,
    },

    /// Rank all recipes against a free-text query
    Semantic {
        /// The query text
        query: String,

        /// Print only the number of results
        #[clap(long, default_value = "false")]
        count: bool,
    },

    /// Import the seed dataset. Does nothing when recipes already exist.
    Import {},

    /// Print the total number of stored recipes
    Total {},
}
