use graft::messaging::{call_started_notice, EventBus, SocketEvent};

#[tokio::test]
async fn every_subscriber_sees_call_announcements() {
    let bus = EventBus::default();
    let mut ada = bus.subscribe();
    let mut grace = bus.subscribe();

    bus.start_call("ada", "room-1").unwrap();

    for (rx, user, expected) in [
        (&mut ada, "ada", None),
        (&mut grace, "grace", Some("ada started a video call")),
    ] {
        match rx.recv().await.unwrap() {
            SocketEvent::VideoCallStarted(started) => {
                assert_eq!(call_started_notice(&started, user).as_deref(), expected);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}

#[tokio::test]
async fn chat_messages_round_trip_over_json() {
    let bus = EventBus::default();
    let mut rx = bus.subscribe();
    let sent = bus.send_message("grace", "  shipping it  ").unwrap();

    let event = rx.recv().await.unwrap();
    let wire = serde_json::to_string(&event).unwrap();
    let decoded: SocketEvent = serde_json::from_str(&wire).unwrap();
    assert_eq!(decoded, SocketEvent::SendMessage { message: sent.clone() });
    assert_eq!(sent.message, "shipping it");
}
