use qrc_service::Config;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
output-dir: "/srv/www/qrcodes"
default-size: 256
error-correction: H
url-prefix: "/static/qr/"
"#;
    let cfg: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/srv/www/qrcodes"));
    assert_eq!(cfg.default_size, 256);
    assert_eq!(cfg.error_correction, "H");
    assert_eq!(cfg.url_prefix, "/static/qr/");
    cfg.validate().unwrap();
}

#[test]
fn partial_config_keeps_defaults() {
    let cfg: Config = serde_yaml::from_str("default-size: 300\n").unwrap();
    assert_eq!(cfg.default_size, 300);
    assert_eq!(cfg.error_correction, "M");
    assert_eq!(cfg.output_dir, PathBuf::from("www/qrcodes"));
}

#[test]
fn unknown_keys_are_ignored() {
    let cfg: Config = serde_yaml::from_str("output-dir: out\nextra: 1\n").unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("out"));
}

#[test]
fn load_reads_file_and_reports_path_on_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("qrcservice.yaml");
    std::fs::write(&path, "error-correction: Q\n").unwrap();
    let cfg = Config::load(&path).unwrap();
    assert_eq!(cfg.error_correction, "Q");

    std::fs::write(&path, "default-size: [not, a, number]\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err}").contains("failed to parse config"));
}

#[test]
fn load_or_default_falls_back_when_missing() {
    let tmp = tempdir().unwrap();
    let cfg = Config::load_or_default(&tmp.path().join("absent.yaml")).unwrap();
    assert_eq!(cfg.default_size, 128);
}

#[test]
fn validate_rejects_bad_values() {
    let cfg: Config = serde_yaml::from_str("default-size: 1024\n").unwrap();
    assert!(cfg.validate().is_err());
    let cfg: Config = serde_yaml::from_str("error-correction: low\n").unwrap();
    assert!(cfg.validate().is_err());
}
