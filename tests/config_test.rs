use std::fs;
use std::path::PathBuf;

use ccx::config::Config;
use ccx::error::Error;
use tempfile::TempDir;

#[test]
fn test_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(temp_dir.path()).unwrap();

    assert_eq!(config.configs_path(), temp_dir.path().join("ccx-config.yml"));
    assert_eq!(
        config.simple_template_paths().unwrap(),
        vec![temp_dir.path().join("simple-templates")]
    );
    assert_eq!(
        config.cookiecutter_template_paths().unwrap(),
        vec![temp_dir.path().join("cookiecutter-templates")]
    );
}

#[test]
fn test_paths_are_normalized_and_sorted() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("ccx-config.yml"),
        "simple_templates:\n  paths:\n    - zeta\n    - ./templates/../alpha\n    - /opt/templates\ncookiecutter_templates:\n  paths: cc\n",
    )
    .unwrap();
    let config = Config::load_from(temp_dir.path()).unwrap();

    let mut expected = vec![
        PathBuf::from("/opt/templates"),
        temp_dir.path().join("alpha"),
        temp_dir.path().join("zeta"),
    ];
    expected.sort();
    assert_eq!(config.simple_template_paths().unwrap(), expected);
    assert_eq!(config.cookiecutter_template_paths().unwrap(), vec![temp_dir.path().join("cc")]);
}

#[test]
fn test_tilde_expansion() {
    let config = Config::load_from(TempDir::new().unwrap().path()).unwrap();
    let home = dirs::home_dir().unwrap();
    assert_eq!(config.normalize_path("~/templates"), home.join("templates"));
}

#[test]
fn test_get_dotted_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ccx-config.yml"), "a:\n  b:\n    c: 1\n").unwrap();
    let config = Config::load_from(temp_dir.path()).unwrap();

    assert_eq!(config.get("a.b.c").unwrap().and_then(|v| v.as_i64()), Some(1));
    assert!(config.get("a.x").unwrap().is_none());
    assert!(matches!(config.get(""), Err(Error::ConfigError(_))));
}

#[test]
fn test_invalid_paths_value() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ccx-config.yml"), "simple_templates:\n  paths:\n    a: b\n")
        .unwrap();
    let config = Config::load_from(temp_dir.path()).unwrap();
    assert!(matches!(config.simple_template_paths(), Err(Error::ConfigError(_))));
}

#[test]
fn test_invalid_yaml() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ccx-config.yml"), "a: [unclosed").unwrap();
    assert!(matches!(Config::load_from(temp_dir.path()), Err(Error::ConfigError(_))));
}
