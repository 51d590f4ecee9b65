use crate::storage::{BackendLocal, StorageManager};
use serde::{Deserialize, Serialize};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATASET_FILE: &str = "recipes-dataset.json";

/// Default embedding model. The dataset embeddings in the wild were produced
/// with MiniLM, so changing this invalidates stored embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Configuration for the embedding model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_dataset_file() -> String {
    DEFAULT_DATASET_FILE.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Address the daemon binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Seed dataset file, relative to the base path unless absolute
    #[serde(default = "default_dataset_file")]
    pub dataset_file: String,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            dataset_file: default_dataset_file(),
            embedding: EmbeddingConfig::default(),
            base_path: String::new(),
        }
    }
}

impl Config {
    fn validate(&self) {
        if self.listen_addr.is_empty() {
            panic!("listen_addr must not be empty");
        }

        if self.embedding.model.is_empty() {
            panic!("embedding.model must not be empty");
        }

        if self.embedding.download_timeout_secs == 0 {
            panic!("embedding.download_timeout_secs must be greater than 0");
        }
    }

    pub fn load_with(base_path: &str) -> Self {
        let store = BackendLocal::new(base_path).expect("couldnt create base directory");

        // create new if does not exist
        if !store.exists("config.yaml") {
            store
                .write(
                    "config.yaml",
                    serde_yml::to_string(&Self::default()).unwrap().as_bytes(),
                )
                .expect("couldnt write default config");
        }

        let config_str = String::from_utf8(store.read("config.yaml").expect("couldnt read config"))
            .expect("config file is not valid utf8");
        let mut config: Self = serde_yml::from_str(&config_str).expect("config is malformed");

        config.base_path = base_path.to_string();

        config.validate();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config).unwrap() {
            config.save();
        }

        config
    }

    pub fn save(&self) {
        let store = BackendLocal::new(&self.base_path).expect("couldnt create base directory");

        let config_str = serde_yml::to_string(&self).unwrap();
        store
            .write("config.yaml", config_str.as_bytes())
            .expect("couldnt write config");
    }

    /// Absolute path of the seed dataset file.
    pub fn dataset_path(&self) -> String {
        if self.dataset_file.starts_with('/') {
            self.dataset_file.clone()
        } else {
            format!("{}/{}", self.base_path, self.dataset_file)
        }
    }
}
