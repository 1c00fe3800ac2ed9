//! End-to-end CLI tests against a mock device on a local TCP port.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;

use devframe_codec::{Frame, OpCode, FRAME_LEN};

/// One-shot mock device: accepts a single connection, validates the
/// request with `check`, answers with `response`.
fn spawn_device<F>(check: F, response: Frame) -> (String, thread::JoinHandle<()>)
where
    F: FnOnce(&Frame) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("mock device should bind");
    let addr = listener.local_addr().expect("bound address").to_string();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("client should connect");
        let mut request = [0u8; FRAME_LEN];
        stream
            .read_exact(&mut request)
            .expect("request frame should arrive whole");
        check(&Frame::from_array(request));
        stream
            .write_all(response.as_bytes())
            .expect("response frame should send");
    });
    (addr, handle)
}

fn devframe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_devframe"))
}

#[test]
fn alarm_list_renders_entries_and_sentinels() {
    let mut response = Frame::new();
    response.set_destination(2);
    response.set_header(OpCode::Res, 3).unwrap();
    response.write_body_u8(0, 2).unwrap();
    // record 0: index 0, 00:05:00, Monday
    response.write_body_u8(1, 0).unwrap();
    response.write_body_u32(2, 300).unwrap();
    response.write_body_u8(6, 0x02).unwrap();
    // record 1: index 1, sunset sentinel, no days
    response.write_body_u8(7, 1).unwrap();
    response.write_body_u32(8, u32::MAX - 1).unwrap();
    response.write_body_u8(12, 0x00).unwrap();

    let (addr, device) = spawn_device(
        |request| {
            assert_eq!(request.destination(), 2);
            assert_eq!(request.operation(), OpCode::Get);
            assert_eq!(request.identity(), 3);
        },
        response,
    );

    let output = devframe()
        .args(["--format", "json", "--log-level", "error", "alarm", &addr, "list"])
        .output()
        .expect("binary should run");
    device.join().expect("mock device should finish");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    let stdout = String::from_utf8(output.stdout).expect("json output is utf-8");
    assert!(stdout.contains("\"time\":\"00:05:00\""), "{stdout}");
    assert!(stdout.contains("\"days\":\"Monday\""), "{stdout}");
    assert!(stdout.contains("\"time\":\"Sunset\""), "{stdout}");
    assert!(stdout.contains("\"days\":\"none\""), "{stdout}");
}

#[test]
fn alarm_insert_dry_run_prints_wire_image() {
    let trigger = Frame::new().to_hex();
    let output = devframe()
        .args([
            "--format",
            "raw",
            "--log-level",
            "error",
            "alarm",
            "127.0.0.1:1",
            "insert",
            "--at",
            "07:30:00",
            "--days",
            "weekdays",
            "--trigger",
            &trigger,
            "--dry-run",
        ])
        .output()
        .expect("binary should run");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    let stdout = String::from_utf8(output.stdout).expect("hex output is utf-8");
    let image = stdout.trim();
    assert_eq!(image.len(), FRAME_LEN * 2);
    // origin 0, destination 2, SET|insert, reserved 0, 27000 BE, weekday mask
    assert!(image.starts_with("00020100000069783e"), "{image}");
}

#[test]
fn send_surfaces_device_error_as_failure_exit() {
    let mut request = Frame::new();
    request.set_destination(2);
    request.set_header(OpCode::Set, 2).unwrap();
    request.write_body_u8(0, 7).unwrap();

    let mut response = Frame::new();
    response.set_destination(2);
    response.set_header(OpCode::Err, 2).unwrap();

    let request_hex = request.to_hex();
    let (addr, device) = spawn_device(
        move |received| assert_eq!(received, &request),
        response,
    );

    let output = devframe()
        .args([
            "--format",
            "json",
            "--log-level",
            "error",
            "send",
            &addr,
            "--frame",
            &request_hex,
        ])
        .output()
        .expect("binary should run");
    device.join().expect("mock device should finish");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("json output is utf-8");
    assert!(stdout.contains("\"class\":\"error\""), "{stdout}");
}

#[test]
fn alarm_remove_rejects_out_of_range_index() {
    let output = devframe()
        .args([
            "--log-level",
            "error",
            "alarm",
            "127.0.0.1:1",
            "remove",
            "--index",
            "256",
            "--dry-run",
        ])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(64), "stderr: {:?}", output.stderr);
}

#[test]
fn short_device_response_exits_with_transport_code() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("mock device should bind");
    let addr = listener.local_addr().expect("bound address").to_string();
    let device = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("client should connect");
        let mut request = [0u8; FRAME_LEN];
        stream.read_exact(&mut request).expect("request arrives");
        // Half a frame, then close.
        stream.write_all(&[0u8; 64]).expect("partial response sends");
        drop(stream);
    });

    let output = devframe()
        .args([
            "--log-level",
            "error",
            "alarm",
            &addr,
            "list",
            "--io-timeout",
            "2s",
        ])
        .output()
        .expect("binary should run");
    device.join().expect("mock device should finish");

    assert_eq!(output.status.code(), Some(3), "stderr: {:?}", output.stderr);
}
