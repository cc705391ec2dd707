// Bulk walk paging and termination tests

mod common;

use common::{MockTransport, Request, if_name_row};
use futures_util::TryStreamExt;
use ifwatch::mib;
use ifwatch::snmp::{ErrorStatus, SnmpError, Value, bulk_walk};

#[tokio::test]
async fn test_walk_pages_until_subtree_ends() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![if_name_row(1, "lo0"), if_name_row(2, "eth0")]);
    transport.push_varbinds(vec![
        if_name_row(3, "eth1"),
        // next column: outside the walked subtree
        (mib::indexed(&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 2], 1), Value::Counter32(9)),
    ]);

    let rows: Vec<_> = bulk_walk(&transport, mib::oid(mib::IF_NAME), 2)
        .try_collect()
        .await
        .unwrap();
    let names: Vec<String> = rows.iter().map(|vb| vb.value.to_text()).collect();
    assert_eq!(names, ["lo0", "eth0", "eth1"]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_walk_stops_at_end_of_mib_view() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![
        if_name_row(1, "lo0"),
        (mib::indexed(mib::IF_NAME, 2), Value::EndOfMibView),
    ]);

    let rows: Vec<_> = bulk_walk(&transport, mib::oid(mib::IF_NAME), 10)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_walk_stops_when_agent_does_not_advance() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![if_name_row(2, "eth0")]);
    // agent answers with an OID at or before the cursor
    transport.push_varbinds(vec![if_name_row(1, "lo0")]);

    let rows: Vec<_> = bulk_walk(&transport, mib::oid(mib::IF_NAME), 1)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_walk_empty_page_ends_walk() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![]);
    let rows: Vec<_> = bulk_walk(&transport, mib::oid(mib::IF_NAME), 10)
        .try_collect()
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_walk_surfaces_error_status() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![if_name_row(1, "lo0")]);
    transport.push_status(ErrorStatus::TooBig, 0);

    let result: Result<Vec<_>, _> = bulk_walk(&transport, mib::oid(mib::IF_NAME), 1)
        .try_collect()
        .await;
    assert!(matches!(
        result,
        Err(SnmpError::Status {
            status: ErrorStatus::TooBig,
            ..
        })
    ));
}

#[tokio::test]
async fn test_walk_is_lazy() {
    let transport = MockTransport::new();
    transport.push_varbinds(vec![if_name_row(1, "lo0")]);
    transport.push_varbinds(vec![if_name_row(2, "eth0")]);

    let mut walk = std::pin::pin!(bulk_walk(&transport, mib::oid(mib::IF_NAME), 1));
    assert!(transport.requests().is_empty());
    let first = walk.try_next().await.unwrap().unwrap();
    assert_eq!(first.value.to_text(), "lo0");
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.pending(), 1);
    assert!(matches!(transport.requests()[0], Request::GetBulk { .. }));
}
