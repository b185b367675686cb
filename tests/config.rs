use pivotgen::config::{AppConfig, ConfigManager, ConfigSection, DataSource, EvolutionConfig};
use pivotgen::data::Timeframe;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    config.validate().unwrap();
    assert_eq!(config.evolution.symbol, "dotusdt");
    assert_eq!(config.evolution.timeframes, Timeframe::all().to_vec());
    assert_eq!(config.evolution.effective_population_size(), 2);
    assert_eq!(config.clustering.n_init, 10);
}

#[test]
fn test_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pivotgen.toml");

    let manager = ConfigManager::new();
    manager
        .update(|app| {
            app.evolution.hall_of_fame_size = 3;
            app.evolution.sample_count = 500;
            app.data.source = DataSource::Csv {
                directory: PathBuf::from("closes"),
            };
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load(Some(&path)).unwrap();
    let config = reloaded.get();
    assert_eq!(config.evolution.hall_of_fame_size, 3);
    assert_eq!(config.evolution.sample_count, 500);
    assert_eq!(
        config.data.source,
        DataSource::Csv {
            directory: PathBuf::from("closes")
        }
    );
}

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[evolution]\nsymbol = \"ethusdt\"\nmutation_rate = 0.2").unwrap();

    std::env::set_var("PIVOTGEN__EVOLUTION__SYMBOL", "btcusdt");
    let manager = ConfigManager::new();
    let result = manager.load(Some(file.path()));
    std::env::remove_var("PIVOTGEN__EVOLUTION__SYMBOL");
    result.unwrap();

    let config = manager.get();
    assert_eq!(config.evolution.symbol, "btcusdt");
    assert_eq!(config.evolution.mutation_rate, 0.2);
}

#[test]
fn test_invalid_file_is_rejected_and_previous_config_kept() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[evolution]\ntrain_split = 1.5").unwrap();

    let manager = ConfigManager::new();
    assert!(manager.load(Some(file.path())).is_err());
    assert_eq!(manager.get().evolution.train_split, 0.2);
}

#[test]
fn test_update_validates_before_commit() {
    let manager = ConfigManager::new();
    assert!(manager
        .update(|app| {
            app.evolution.timeframes.pop();
        })
        .is_err());
    assert_eq!(manager.get().evolution.timeframes.len(), 4);
}

#[test]
fn test_evolution_validation_rules() {
    let single_seed = EvolutionConfig {
        seed_genes: vec!["SSSSSSSSSSSS".to_string()],
        ..EvolutionConfig::default()
    };
    assert!(single_seed.validate().is_err());

    let filled = EvolutionConfig {
        population_size: 6,
        ..single_seed
    };
    assert!(filled.validate().is_ok());

    let bad_rate = EvolutionConfig {
        mutation_rate: 1.5,
        ..EvolutionConfig::default()
    };
    assert!(bad_rate.validate().is_err());
}
