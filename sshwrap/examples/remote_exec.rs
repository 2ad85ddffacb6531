//! Basic example: run a command on a host and optionally copy a file
//!
//! This example demonstrates the one-shot API of sshwrap: every call
//! connects, opens a session, does its work and closes the session.
//!
//! # Prerequisites
//!
//! - SSH server reachable from this machine
//! - Valid credentials (username/password or SSH key)
//! - For `--upload`, the server's SFTP subsystem enabled
//!
//! # Usage
//!
//! With password authentication:
//! ```bash
//! cargo run --example remote_exec -- --host localhost --user your_username --password your_password
//! ```
//!
//! With SSH key authentication and a file round trip:
//! ```bash
//! cargo run --example remote_exec -- --host localhost --user your_username --key ~/.ssh/id_ed25519 \
//!     --upload ./notes.txt --remote /tmp/notes.txt
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use sshwrap::ClientBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = ClientBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    let client = builder.build()?;

    println!("Executing on {}:{}: {}", args.host, args.port, args.command);
    println!("{}", "-".repeat(50));

    match client.run(&args.command).await {
        Ok(response) => {
            print!("{}", response.stdout);
            eprint!("{}", response.stderr);
            println!("{}", "-".repeat(50));
            println!("Command completed in {:?}", response.elapsed);
        }
        Err(e) => {
            if let Some(response) = e.response() {
                print!("{}", response.stdout);
                eprint!("{}", response.stderr);
            }
            eprintln!("Command failed: {}", e);
        }
    }

    if let Some(local) = &args.upload {
        let remote = args
            .remote
            .clone()
            .unwrap_or_else(|| format!("/tmp/{}", file_name(local)));

        println!("\nUploading {} to {}", local.display(), remote);
        let sent = client.copy_to_remote(local, &remote).await?;
        println!("Sent {} bytes", sent);

        let back = local.with_extension("roundtrip");
        let received = client.copy_from_remote(&remote, &back).await?;
        println!("Fetched {} bytes back into {}", received, back.display());
    }

    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    command: String,
    upload: Option<PathBuf>,
    remote: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "root".to_string());
        let mut password = None;
        let mut key = None;
        let mut timeout = 30u64;
        let mut command = "uname -a".to_string();
        let mut upload = None;
        let mut remote = None;

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => host = value.unwrap_or(host),
                "--port" | "-p" => port = value.and_then(|v| v.parse().ok()).unwrap_or(22),
                "--user" | "-u" => user = value.unwrap_or(user),
                "--password" | "-P" => password = value,
                "--key" | "-k" => key = value.map(PathBuf::from),
                "--timeout" | "-t" => timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30),
                "--command" | "-c" => command = value.unwrap_or(command),
                "--upload" => upload = value.map(PathBuf::from),
                "--remote" => remote = value,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            timeout,
            command,
            upload,
            remote,
        }
    }

    fn print_help() {
        println!(
            r#"sshwrap remote_exec example

USAGE:
    cargo run --example remote_exec -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -t, --timeout <SECS>     Dial timeout [default: 30]
    -c, --command <CMD>      Command to run [default: uname -a]
    --upload <PATH>          Local file to upload and fetch back
    --remote <PATH>          Remote path used for the round trip [default: /tmp/<name>]
    --help                   Print this help message
"#
        );
    }
}
