//! Publish tests against a mock listings API

use market_trawler::output::BatchPublisher;
use market_trawler::record::{Field, PartialRecord};
use market_trawler::Record;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|n| {
            let mut partial = PartialRecord::for_site("riyasewana");
            partial.set(Field::Title, &format!("Toyota Axio {}", n));
            partial.set(Field::Price, "7,250,000");
            partial.set(Field::Url, &format!("https://riyasewana.com/buy/axio-{}", n));
            partial.set(Field::Description, "YOM: 2015 | Gear: Automatic");
            partial.set(Field::ModelYear, "2015");
            partial.add_images([format!("https://riyasewana.com/uploads/axio-{}.jpg", n)]);
            partial.finalize().unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_chunks_sent_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/vehicles"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&server)
        .await;

    let records = records(45);
    let publisher =
        BatchPublisher::new(&format!("{}/api/vehicles", server.uri()), "test-key", 20).unwrap();
    let report = publisher.publish(&records).await;

    assert_eq!(report.chunks_sent, 3);
    assert_eq!(report.records_accepted, 45);
    assert!(report.is_complete());

    let received = server.received_requests().await.unwrap();
    let chunks: Vec<Vec<Record>> = received
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect();

    assert_eq!(
        chunks.iter().map(Vec::len).collect::<Vec<_>>(),
        [20, 20, 5]
    );
    assert_eq!(chunks[0][0], records[0]);
    assert_eq!(chunks[1][0], records[20]);
    assert_eq!(chunks[2][4], records[44]);
}

#[tokio::test]
async fn test_published_body_uses_wire_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let publisher = BatchPublisher::new(&server.uri(), "test-key", 20).unwrap();
    publisher.publish(&records(1)).await;

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let record = &body[0];

    assert_eq!(record["modelYear"], "2015");
    assert_eq!(record["site"], "riyasewana");
    assert!(record["fuelType"].is_null());
    assert!(record["image"].is_array());
}

#[tokio::test]
async fn test_rejected_chunk_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(2)
        .mount(&server)
        .await;

    let publisher = BatchPublisher::new(&server.uri(), "wrong", 20).unwrap();
    let report = publisher.publish(&records(25)).await;

    assert_eq!(report.chunks_sent, 0);
    assert_eq!(report.chunks_failed, 2);
    assert_eq!(report.records_rejected, 25);
    assert!(!report.is_complete());
}
