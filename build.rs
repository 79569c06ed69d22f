use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;

    anyhow::ensure!(output.status.success(), "exit with {}", output.status);
    Ok(String::from_utf8(output.stdout)?)
}

fn main() {
    let git_commit_hash = match exe_cmd(Command::new("git").args([
        "log",
        "-n",
        "1",
        "--pretty=format:%H",
    ])) {
        Ok(s) => s[..8.min(s.len())].trim().to_string(),
        Err(e) => {
            println!("cargo:warning=git log run failed: {e}");
            String::default()
        }
    };

    println!(
        "cargo:rustc-env=QRAND_VERSION_INFO={}-{}",
        env!("CARGO_PKG_VERSION"),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );

    println!("cargo:rustc-env=QRAND_GIT_INFO={}", git_commit_hash);
}
