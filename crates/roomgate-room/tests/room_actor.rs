//! Integration tests for the room actor under concurrent access.

use std::collections::HashSet;

use roomgate_protocol::{Codec, JsonCodec, Response};
use roomgate_room::{HISTORY_WINDOW, RoomConfig, RoomError, RoomHandle, spawn_room};
use roomgate_transport::{ConnectionId, MAX_MESSAGE_SIZE};

// =========================================================================
// Helpers
// =========================================================================

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn room_with_capacity(capacity: usize) -> RoomHandle {
    spawn_room(RoomConfig::with_capacity(capacity))
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_enter_leave_round_trip() {
    let room = room_with_capacity(5);

    let admission = room.enter("X", conn(1)).await.unwrap();
    assert_eq!(admission.occupancy, 1);
    assert!(room.status().await.unwrap().occupants.contains(&"X".to_string()));

    room.leave("X").await.unwrap();
    let snapshot = room.status().await.unwrap();
    assert!(!snapshot.occupants.contains(&"X".to_string()));
    assert_eq!(snapshot.occupancy, 0);
}

#[tokio::test]
async fn test_three_concurrent_enters_capacity_two() {
    let room = room_with_capacity(2);

    let mut tasks = Vec::new();
    for (i, id) in ["A", "B", "C"].into_iter().enumerate() {
        let room = room.clone();
        tasks.push(tokio::spawn(async move {
            (id, room.enter(id, conn(i as u64)).await)
        }));
    }

    let mut granted = Vec::new();
    let mut rejected = Vec::new();
    for task in tasks {
        let (id, result) = task.await.unwrap();
        match result {
            Ok(_) => granted.push(id),
            Err(e) => rejected.push((id, e)),
        }
    }

    assert_eq!(granted.len(), 2);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].1, RoomError::RoomFull { capacity: 2 });

    let snapshot = room.status().await.unwrap();
    assert_eq!(snapshot.occupancy, 2);
    let inside: HashSet<_> = snapshot.occupants.iter().map(String::as_str).collect();
    let expected: HashSet<_> = granted.into_iter().collect();
    assert_eq!(inside, expected);
}

#[tokio::test]
async fn test_last_slot_has_exactly_one_winner() {
    for _ in 0..20 {
        let room = room_with_capacity(3);
        room.enter("pre-1", conn(0)).await.unwrap();
        room.enter("pre-2", conn(0)).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..16u64 {
            let room = room.clone();
            tasks.push(tokio::spawn(async move {
                room.enter(format!("racer-{i}"), conn(i + 1)).await.is_ok()
            }));
        }
        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(room.status().await.unwrap().occupancy, 3);
    }
}

#[tokio::test]
async fn test_same_id_concurrently_enters_once() {
    let room = room_with_capacity(10);

    let mut tasks = Vec::new();
    for i in 0..8u64 {
        let room = room.clone();
        tasks.push(tokio::spawn(async move { room.enter("dup", conn(i)).await }));
    }
    let mut ok = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert_eq!(e, RoomError::AlreadyPresent("dup".into())),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(room.status().await.unwrap().occupants, vec!["dup"]);
}

#[tokio::test]
async fn test_snapshots_are_consistent_under_churn() {
    let room = room_with_capacity(4);

    let mut churn = Vec::new();
    for w in 0..6u64 {
        let room = room.clone();
        churn.push(tokio::spawn(async move {
            for round in 0..25 {
                let id = format!("w{w}-{round}");
                if room.enter(id.clone(), conn(w)).await.is_ok() {
                    tokio::task::yield_now().await;
                    room.leave(id).await.unwrap();
                }
            }
        }));
    }

    for _ in 0..100 {
        let snapshot = room.status().await.unwrap();
        assert_eq!(snapshot.occupancy, snapshot.occupants.len());
        assert!(snapshot.occupancy <= snapshot.capacity);
        assert!(snapshot.history.len() <= HISTORY_WINDOW);
        tokio::task::yield_now().await;
    }

    for task in churn {
        task.await.unwrap();
    }
    assert_eq!(room.status().await.unwrap().occupancy, 0);
}

#[tokio::test]
async fn test_leave_unknown_id() {
    let room = room_with_capacity(2);
    let err = room.leave("nobody").await.unwrap_err();
    assert_eq!(err, RoomError::NotPresent("nobody".into()));
    assert!(room.status().await.unwrap().history.is_empty());
}

#[tokio::test]
async fn test_release_connection_through_handle() {
    let room = spawn_room(RoomConfig {
        release_on_disconnect: true,
        ..RoomConfig::with_capacity(3)
    });
    assert!(room.release_on_disconnect());

    room.enter("A", conn(7)).await.unwrap();
    room.enter("B", conn(8)).await.unwrap();

    let released = room.release_connection(conn(7)).await.unwrap();
    assert_eq!(released, vec!["A"]);
    assert_eq!(room.status().await.unwrap().occupants, vec!["B"]);
}

#[tokio::test]
async fn test_requests_fail_after_shutdown() {
    let room = room_with_capacity(1);
    room.shutdown().await.unwrap();

    // The actor drains the shutdown command and drops its receiver.
    let mut result = room.status().await;
    for _ in 0..10 {
        if result.is_err() {
            break;
        }
        tokio::task::yield_now().await;
        result = room.status().await;
    }
    assert_eq!(result.unwrap_err(), RoomError::Unavailable);
}

#[tokio::test]
async fn test_full_status_reply_fits_one_read() {
    let room = room_with_capacity(5);

    for n in 9990..9995 {
        let id = format!("Fernanda_{n}");
        room.enter(id.clone(), conn(n)).await.unwrap();
        room.leave(id).await.unwrap();
    }
    for n in 9995..10000 {
        room.enter(format!("Fernanda_{n}"), conn(n)).await.unwrap();
    }

    let snapshot = room.status().await.unwrap();
    assert_eq!(snapshot.occupancy, 5);
    assert_eq!(snapshot.history.len(), HISTORY_WINDOW);

    let bytes = JsonCodec.encode(&Response::snapshot(snapshot)).unwrap();
    assert!(bytes.len() <= MAX_MESSAGE_SIZE, "{} bytes", bytes.len());
}
