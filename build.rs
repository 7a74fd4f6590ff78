use std::env;

fn non_empty_env(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn main() {
    let revision = non_empty_env("GOMI_REVISION")
        .or_else(|| non_empty_env("GIT_COMMIT"))
        .unwrap_or_else(|| "unset".to_string());

    println!("cargo:rustc-env=GOMI_REVISION={revision}");
    println!("cargo:rerun-if-env-changed=GOMI_REVISION");
    println!("cargo:rerun-if-env-changed=GIT_COMMIT");
    println!("cargo:rerun-if-changed=build.rs");
}
