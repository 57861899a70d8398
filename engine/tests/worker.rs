//! Worker integration tests driven by a scripted stand-in engine, so they
//! run without a real engine installed.

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use engine::{uci, EngineCommand, EngineEvent, EngineError, EngineWorker, WorkerConfig};

/// Write a minimal UCI-speaking shell script and return its path.
fn fake_engine() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake-engine.sh");

    let mut f = std::fs::File::create(&path).unwrap();
    write!(
        f,
        "#!/bin/sh\n\
         while read line; do\n\
           case \"$line\" in\n\
             uci) echo \"id name fake\"; echo \"uciok\";;\n\
             isready) echo \"readyok\";;\n\
             go*) echo \"info depth 1 score cp 0\"; echo \"bestmove e2e4\";;\n\
             quit) exit 0;;\n\
           esac\n\
         done\n"
    )
    .unwrap();
    drop(f);

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    (dir, path)
}

#[tokio::test]
async fn spawn_search_and_receive_bestmove() {
    let (_dir, path) = fake_engine();
    let mut worker = EngineWorker::spawn(WorkerConfig {
        path: Some(path),
        ..Default::default()
    })
    .await
    .expect("worker should spawn");

    worker
        .send_command(EngineCommand::SetPosition {
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
        })
        .await
        .unwrap();
    worker
        .send_command(EngineCommand::Go { depth: 18 })
        .await
        .unwrap();

    // The readyok acknowledgement may arrive before the search result; only
    // the bestmove matters.
    loop {
        match worker.recv_event().await {
            Some(EngineEvent::BestMove(mv)) => {
                assert_eq!(uci::format_uci_move(&mv), "e2e4");
                break;
            }
            Some(EngineEvent::Ready) => {}
            other => panic!("unexpected event: {:?}", other),
        }
    }

    worker.shutdown().await;
}

#[tokio::test]
async fn spawn_fails_for_missing_binary() {
    let result = EngineWorker::spawn(WorkerConfig {
        path: Some(PathBuf::from("/nonexistent/engine-binary")),
        ..Default::default()
    })
    .await;

    assert!(matches!(result, Err(EngineError::Spawn(_))));
}
