use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=config.toml");

    let defaults = fs::read_to_string("config.toml").expect("Failed to read config.toml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("config_embedded.rs");

    fs::write(
        dest,
        format!("pub const DEFAULT_CONFIG: &str = r#\"{defaults}\"#;"),
    )
    .expect("Failed to write embedded config");
}
