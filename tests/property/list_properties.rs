//! Property-based tests for task list synchronization.
//!
//! Uses proptest to verify:
//! 1. N confirmed creates on a list of K tasks yield exactly K + N tasks,
//!    with the originals first and in their original order.
//! 2. Blank titles never reach the network and never change the list.
//! 3. Any rejection status other than 401/403 keeps the session and the list.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use taskflow::gateway::Gateway;
use taskflow::session::{CredentialStore, MemoryStore};
use taskflow::todos::{ListController, TODOS_PATH};
use taskflow::transport::Method;
use taskflow::transport::loopback::LoopbackTransport;

type Controller = ListController<LoopbackTransport, MemoryStore>;
type Gw = Arc<Gateway<LoopbackTransport, MemoryStore>>;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn task(id: usize, title: &str) -> serde_json::Value {
    json!({ "id": id, "title": title, "userId": 1 })
}

/// Helper: a controller whose list is ready with `initial` tasks.
async fn ready(initial: usize) -> (Controller, Gw) {
    let gw = Arc::new(Gateway::new(
        LoopbackTransport::new(),
        Arc::new(MemoryStore::with_token("tok")),
    ));
    let tasks: Vec<_> = (0..initial).map(|i| task(i, &format!("t{i}"))).collect();
    gw.transport()
        .reply(Method::Get, TODOS_PATH, 200, &serde_json::Value::Array(tasks));

    let mut ctl = ListController::new(Arc::clone(&gw), 64);
    ctl.mount();
    ctl.process_next().await;
    (ctl, gw)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn confirmed_creates_append_in_order(
        initial in 0usize..8,
        titles in prop::collection::vec("[a-z]{1,12}", 0..12),
    ) {
        let rt = runtime();
        let (ids, count) = rt.block_on(async {
            let (mut ctl, gw) = ready(initial).await;
            for (n, title) in titles.iter().enumerate() {
                gw.transport()
                    .reply(Method::Post, TODOS_PATH, 201, &task(1000 + n, title));
                ctl.create(title);
                ctl.process_next().await;
            }
            let ids: Vec<i64> = ctl.tasks().iter().map(|t| t.id.as_raw()).collect();
            (ids, ctl.tasks().len())
        });

        prop_assert_eq!(count, initial + titles.len());
        for (i, id) in ids.iter().enumerate() {
            let expected = if i < initial { i } else { 1000 + i - initial };
            prop_assert_eq!(*id, i64::try_from(expected).unwrap());
        }
    }

    #[test]
    fn blank_titles_never_send(
        initial in 0usize..5,
        blanks in prop::collection::vec("[ \t\n]{0,8}", 1..10),
    ) {
        let rt = runtime();
        let (requests, count) = rt.block_on(async {
            let (mut ctl, gw) = ready(initial).await;
            for blank in &blanks {
                prop_assert_eq!(ctl.create(blank), None);
            }
            tokio::task::yield_now().await;
            Ok((gw.transport().request_count(), ctl.tasks().len()))
        })?;

        // Only the initial GET was sent.
        prop_assert_eq!(requests, 1);
        prop_assert_eq!(count, initial);
    }

    #[test]
    fn non_auth_rejections_keep_session(
        status in (400u16..600).prop_filter("auth statuses", |s| *s != 401 && *s != 403),
    ) {
        let rt = runtime();
        let (has_session, count, notice) = rt.block_on(async {
            let (mut ctl, gw) = ready(2).await;
            gw.transport().reply(Method::Post, TODOS_PATH, status, &json!({}));
            ctl.create("x");
            ctl.process_next().await;
            (
                gw.store().has_session(),
                ctl.tasks().len(),
                ctl.notice().map(str::to_string),
            )
        });

        prop_assert!(has_session);
        prop_assert_eq!(count, 2);
        prop_assert_eq!(notice.as_deref(), Some("request failed"));
    }
}
