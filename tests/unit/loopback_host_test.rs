//! The in-process host: authoritative tab list, command replies, and the
//! notifications it pushes for each of them.

use aero_shell::channel::loopback::LoopbackHost;
use aero_shell::channel::CommandChannel;
use aero_shell::types::command::{Command, CommandReply};
use aero_shell::types::errors::ChannelError;
use aero_shell::types::event::HostEvent;
use aero_shell::types::tab::{TabPatch, TabRecord};
use rstest::rstest;
use tokio::sync::mpsc;

fn drain(rx: &mut mpsc::UnboundedReceiver<HostEvent>) -> Vec<HostEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn names(events: &[HostEvent]) -> Vec<&'static str> {
    events.iter().map(HostEvent::name).collect()
}

async fn create(host: &LoopbackHost, url: Option<&str>) -> TabRecord {
    host.invoke(Command::TabCreate {
        url: url.map(str::to_string),
    })
    .await
    .unwrap()
    .into_tab("tab_create")
    .unwrap()
}

async fn host_with_tabs(n: usize) -> (LoopbackHost, mpsc::UnboundedReceiver<HostEvent>) {
    let (host, mut rx) = LoopbackHost::new();
    for _ in 0..n {
        create(&host, None).await;
    }
    drain(&mut rx);
    (host, rx)
}

#[tokio::test]
async fn test_create_assigns_sequential_labels_and_activates() {
    let (host, mut rx) = LoopbackHost::new();
    let first = create(&host, None).await;
    let second = create(&host, Some("example.com")).await;

    assert_eq!(first.label, "tab-1");
    assert_eq!(first.url, "about:blank");
    assert_eq!(first.title, "New Tab");
    assert!(first.is_loading);
    assert_eq!(second.label, "tab-2");
    assert_eq!(second.url, "https://example.com");
    assert_eq!(host.labels(), vec!["tab-1", "tab-2"]);
    assert_eq!(host.active_label().as_deref(), Some("tab-2"));

    let events = drain(&mut rx);
    assert_eq!(events, vec![HostEvent::TabCreated(first), HostEvent::TabCreated(second)]);
}

#[rstest]
#[case(Some("http://plain.test"), "http://plain.test")]
#[case(Some("about:config"), "about:config")]
#[case(Some(""), "https://start.test")]
#[case(None, "https://start.test")]
#[case(Some("docs.rs/tokio"), "https://docs.rs/tokio")]
#[tokio::test]
async fn test_url_normalisation(#[case] url: Option<&str>, #[case] expected: &str) {
    let (host, _rx) = LoopbackHost::with_default_url("https://start.test");
    assert_eq!(create(&host, url).await.url, expected);
}

#[tokio::test]
async fn test_get_all_and_get_active() {
    let (host, _rx) = host_with_tabs(2).await;
    let tabs = host
        .invoke(Command::TabGetAll)
        .await
        .unwrap()
        .into_tabs("tab_get_all")
        .unwrap();
    assert_eq!(tabs.len(), 2);
    let active = host
        .invoke(Command::TabGetActive)
        .await
        .unwrap()
        .into_active_label("tab_get_active")
        .unwrap();
    assert_eq!(active.as_deref(), Some("tab-2"));
}

#[tokio::test]
async fn test_close_active_activates_right_neighbour() {
    let (host, mut rx) = host_with_tabs(3).await;
    host.invoke(Command::TabSetActive {
        label: "tab-2".to_string(),
    })
    .await
    .unwrap();
    drain(&mut rx);

    host.invoke(Command::TabClose {
        label: "tab-2".to_string(),
    })
    .await
    .unwrap();

    let events = drain(&mut rx);
    assert_eq!(names(&events), vec!["tab_closed", "tab_activated"]);
    assert!(matches!(&events[1], HostEvent::TabActivated(t) if t.label == "tab-3"));
    assert_eq!(host.active_label().as_deref(), Some("tab-3"));
}

#[tokio::test]
async fn test_close_rightmost_active_activates_left_neighbour() {
    let (host, mut rx) = host_with_tabs(2).await;
    host.invoke(Command::TabClose {
        label: "tab-2".to_string(),
    })
    .await
    .unwrap();
    let events = drain(&mut rx);
    assert!(matches!(&events[1], HostEvent::TabActivated(t) if t.label == "tab-1"));
}

#[tokio::test]
async fn test_close_inactive_emits_only_closed() {
    let (host, mut rx) = host_with_tabs(2).await;
    host.invoke(Command::TabClose {
        label: "tab-1".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(names(&drain(&mut rx)), vec!["tab_closed"]);
    assert_eq!(host.active_label().as_deref(), Some("tab-2"));
}

#[tokio::test]
async fn test_closing_last_tab_opens_a_new_one() {
    let (host, mut rx) = host_with_tabs(1).await;
    host.invoke(Command::TabClose {
        label: "tab-1".to_string(),
    })
    .await
    .unwrap();
    assert_eq!(names(&drain(&mut rx)), vec!["tab_closed", "tab_created"]);
    assert_eq!(host.labels(), vec!["tab-2"]);
    assert_eq!(host.active_label().as_deref(), Some("tab-2"));
}

#[tokio::test]
async fn test_close_unknown_is_silent() {
    let (host, mut rx) = host_with_tabs(1).await;
    let reply = host
        .invoke(Command::TabClose {
            label: "tab-42".to_string(),
        })
        .await;
    assert_eq!(reply, Ok(CommandReply::Done));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_set_active_unknown_is_rejected() {
    let (host, mut rx) = host_with_tabs(1).await;
    let reply = host
        .invoke(Command::TabSetActive {
            label: "tab-42".to_string(),
        })
        .await;
    assert_eq!(reply, Err(ChannelError::Rejected("Tab tab-42 not found".to_string())));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_reorder_emits_old_and_new_index() {
    let (host, mut rx) = host_with_tabs(3).await;
    host.invoke(Command::TabReorder {
        label: "tab-3".to_string(),
        new_index: 0,
    })
    .await
    .unwrap();

    assert_eq!(host.labels(), vec!["tab-3", "tab-1", "tab-2"]);
    assert_eq!(
        drain(&mut rx),
        vec![HostEvent::TabReordered {
            label: "tab-3".to_string(),
            old_index: 2,
            new_index: 0
        }]
    );
}

#[tokio::test]
async fn test_reorder_out_of_range_is_rejected() {
    let (host, mut rx) = host_with_tabs(2).await;
    let reply = host
        .invoke(Command::TabReorder {
            label: "tab-1".to_string(),
            new_index: 2,
        })
        .await;
    assert_eq!(reply, Err(ChannelError::Rejected("Invalid index".to_string())));
    assert_eq!(host.labels(), vec!["tab-1", "tab-2"]);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_duplicate_opens_same_url() {
    let (host, _rx) = LoopbackHost::new();
    let source = create(&host, Some("https://a.test/page")).await;
    let copy = host
        .invoke(Command::TabDuplicate {
            label: source.label.clone(),
        })
        .await
        .unwrap()
        .into_tab("tab_duplicate")
        .unwrap();
    assert_ne!(copy.label, source.label);
    assert_eq!(copy.url, source.url);

    let missing = host
        .invoke(Command::TabDuplicate {
            label: "tab-77".to_string(),
        })
        .await;
    assert!(matches!(missing, Err(ChannelError::Rejected(_))));
}

#[tokio::test]
async fn test_offline_host_fails_every_command() {
    let (host, mut rx) = host_with_tabs(1).await;
    host.set_offline(true);
    let reply = host.invoke(Command::TabCreate { url: None }).await;
    assert_eq!(reply, Err(ChannelError::Transport("host unreachable".to_string())));
    assert_eq!(host.labels(), vec!["tab-1"]);
    assert!(drain(&mut rx).is_empty());

    host.set_offline(false);
    assert!(host.invoke(Command::TabGetAll).await.is_ok());
}

#[tokio::test]
async fn test_navigation_history_flags() {
    let (host, mut rx) = host_with_tabs(1).await;
    host.page_started("tab-1", "https://a.test");
    host.page_finished("tab-1", "https://a.test");
    host.page_finished("tab-1", "https://b.test");
    let tab = host.tab("tab-1").unwrap();
    assert_eq!(tab.url, "https://b.test");
    assert!(!tab.is_loading);
    assert_eq!((tab.can_go_back, tab.can_go_forward), (Some(true), Some(false)));

    assert!(host.go_back("tab-1"));
    let tab = host.tab("tab-1").unwrap();
    assert_eq!(tab.url, "https://a.test");
    assert_eq!((tab.can_go_back, tab.can_go_forward), (Some(false), Some(true)));

    // Finishing the traversal load does not push a new entry.
    host.page_finished("tab-1", "https://a.test");
    assert!(!host.go_back("tab-1"));
    assert!(host.go_forward("tab-1"));
    assert_eq!(host.tab("tab-1").unwrap().url, "https://b.test");

    let events = drain(&mut rx);
    assert!(events.iter().all(|e| e.name() == "tab_updated"));
    assert_eq!(
        events[0],
        HostEvent::TabUpdated {
            label: "tab-1".to_string(),
            patch: TabPatch::default().loading(true).url("https://a.test"),
        }
    );
}

#[tokio::test]
async fn test_new_navigation_truncates_forward_history() {
    let (host, _rx) = host_with_tabs(1).await;
    host.page_finished("tab-1", "https://a.test");
    host.page_finished("tab-1", "https://b.test");
    host.go_back("tab-1");
    host.page_finished("tab-1", "https://a.test");
    host.page_finished("tab-1", "https://c.test");
    let tab = host.tab("tab-1").unwrap();
    assert_eq!((tab.can_go_back, tab.can_go_forward), (Some(true), Some(false)));
    assert!(!host.go_forward("tab-1"));
}

#[tokio::test]
async fn test_favicon_must_be_http() {
    let (host, mut rx) = host_with_tabs(1).await;
    host.favicon_changed("tab-1", "https://a.test/favicon.ico");
    assert_eq!(
        host.tab("tab-1").unwrap().favicon.as_deref(),
        Some("https://a.test/favicon.ico")
    );

    host.favicon_changed("tab-1", "data:image/png;base64,AAAA");
    assert_eq!(host.tab("tab-1").unwrap().favicon, None);

    let events = drain(&mut rx);
    assert_eq!(
        events[1],
        HostEvent::TabUpdated {
            label: "tab-1".to_string(),
            patch: TabPatch::default().favicon(None),
        }
    );
}

#[tokio::test]
async fn test_page_activity_for_unknown_tab_is_ignored() {
    let (host, mut rx) = host_with_tabs(1).await;
    host.title_changed("tab-9", "Ghost");
    host.page_finished("tab-9", "https://ghost.test");
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_new_window_request_is_an_event() {
    let (host, mut rx) = LoopbackHost::new();
    host.request_new_window("https://popup.test");
    assert_eq!(
        drain(&mut rx),
        vec![HostEvent::OpenInNewTab("https://popup.test".to_string())]
    );
    assert!(host.labels().is_empty());
}
