#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{Duration, SystemTime};

    use tempfile::tempdir;

    use crate::config::Config;
    use crate::config::loader::{
        ConfigError, load_changed_config_from, load_config_from, save_config_to,
    };

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.controls.horizontal_repeat_ms, 120);
        assert_eq!(config.controls.frame_interval_ms, 16);
        assert!(config.display.show_next);
        assert!(config.display.show_best);
        assert!(config.storage.persist_best);
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("blockfall").join("config.toml");

        let config = load_config_from(&config_path).unwrap();
        assert!(config_path.exists(), "default config file should be written");
        assert_eq!(config.controls.horizontal_repeat_ms, 120);

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("[controls]"));
        assert!(contents.contains("horizontal_repeat_ms"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.controls.horizontal_repeat_ms = 80;
        config.display.show_next = false;
        config.storage.persist_best = false;

        save_config_to(&config_path, &config).unwrap();
        let loaded = load_config_from(&config_path).unwrap();

        assert_eq!(loaded.controls.horizontal_repeat_ms, 80);
        assert!(!loaded.display.show_next);
        assert!(!loaded.storage.persist_best);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[display]\nshow_best = false\n").unwrap();

        let loaded = load_config_from(&config_path).unwrap();
        assert!(!loaded.display.show_best);
        assert!(loaded.display.show_next);
        assert_eq!(loaded.controls.frame_interval_ms, 16);
        assert!(loaded.storage.persist_best);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[controls\nhorizontal_repeat_ms = ").unwrap();

        let result = load_config_from(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unchanged_file_is_not_reloaded() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        // A missing file is created, which counts as a change
        assert!(load_changed_config_from(&config_path).unwrap().is_some());
        assert!(load_changed_config_from(&config_path).unwrap().is_none());

        save_config_to(&config_path, &Config::default()).unwrap();
        assert!(load_changed_config_from(&config_path).unwrap().is_none());

        fs::write(&config_path, "[controls]\nhorizontal_repeat_ms = 75\n").unwrap();
        let file = fs::OpenOptions::new().write(true).open(&config_path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();
        drop(file);

        let reloaded = load_changed_config_from(&config_path)
            .unwrap()
            .expect("edited file should be reloaded");
        assert_eq!(reloaded.controls.horizontal_repeat_ms, 75);
        assert!(load_changed_config_from(&config_path).unwrap().is_none());
    }

    #[test]
    fn test_duration_helpers() {
        let mut config = Config::default();
        config.controls.horizontal_repeat_ms = 90;
        config.controls.frame_interval_ms = 0;

        assert_eq!(config.controls.horizontal_repeat(), Duration::from_millis(90));
        // A zero frame interval would spin the host loop
        assert_eq!(config.controls.frame_interval(), Duration::from_millis(1));
    }
}
