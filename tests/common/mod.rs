use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing the client at a mock server's `/chat`
#[allow(dead_code)]
pub fn config_for_server(server_uri: &str) -> String {
    format!(
        "server:\n  base_url: {}\n  api_url: /chat\n  timeout_seconds: 5\n",
        server_uri
    )
}
