use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn todo_manager_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo-manager"));
    cmd.env_remove("TODO_MANAGER_HOST")
        .env_remove("TODO_MANAGER_PORT")
        .env_remove("TODO_MANAGER_CONFIG")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "info");
    cmd
}

fn http_get(addr: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_version_flag() {
    let output = todo_manager_cmd().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("todo-manager"));
}

#[test]
fn test_serve_with_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("absent.yaml");

    let output = todo_manager_cmd()
        .args(["serve", "--config"])
        .arg(&missing)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config error"));
}

#[test]
fn test_serve_with_malformed_config_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("todo-manager.yaml");
    std::fs::write(&path, "port: [1, 2]\n").unwrap();

    let output = todo_manager_cmd()
        .args(["serve", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("YAML error"));
}

#[test]
fn test_serve_answers_and_stops_on_shutdown() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("todo-manager.yaml");
    std::fs::write(&path, "host: 127.0.0.1\nport: 0\n").unwrap();

    let mut child = todo_manager_cmd()
        .args(["serve", "--config"])
        .arg(&path)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let addr = lines
        .by_ref()
        .map(|line| line.unwrap())
        .find_map(|line| {
            let (_, rest) = line.split_once("ready on http://")?;
            rest.split_whitespace().next().map(str::to_string)
        })
        .unwrap();

    let response = http_get(&addr, "/");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains(r#""status":"ok""#));

    let response = http_get(&addr, "/shutdown");
    assert!(response.starts_with("HTTP/1.1 200"));

    let status = child.wait().unwrap();
    assert!(status.success());
    drop(lines);
}
