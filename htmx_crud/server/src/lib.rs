pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Config {
        #[serde(default = "default_port")]
        pub port: u16,
        /// Origins allowed to call the server from a separately hosted frontend.
        #[serde(default = "default_allowed_origins")]
        pub allowed_origins: Vec<String>,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(
                    environment
                        .try_parsing(true)
                        .list_separator(",")
                        .with_list_parse_key("allowed_origins"),
                )
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                port: default_port(),
                allowed_origins: default_allowed_origins(),
            }
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_allowed_origins() -> Vec<String> {
        vec![
            "http://localhost:5500".to_string(),
            "http://127.0.0.1:5500".to_string(),
        ]
    }

}

pub mod message;
pub mod repository;
pub mod service;
pub mod task;
pub mod user;
pub mod web;
