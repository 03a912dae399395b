use appointmentReminder::clients::webhook_client::WebhookClient;
use appointmentReminder::models::appointment::Appointment;
use appointmentReminder::models::locale::Locale;
use appointmentReminder::service::card_service::CardOptions;
use appointmentReminder::service::notifier::{DeliveryOutcome, Notifier};
use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Europe::Amsterdam;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accepts one request, answers with `status_line` and `body`, and hands
/// back the raw request text.
async fn spawn_webhook(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).to_string()
    });
    (Url::parse(&format!("http://{}/workflows/reminder", addr)).unwrap(), handle)
}

fn notifier(url: Url) -> Notifier<WebhookClient> {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Notifier::new(
        Box::new(WebhookClient::with_client(client, url)),
        CardOptions {
            locale: Locale::Nl,
            timezone: Amsterdam,
            location: "Teams".to_string(),
        },
    )
}

fn appointment() -> Appointment {
    let begin = Utc.with_ymd_and_hms(2025, 10, 30, 13, 30, 0).unwrap();
    Appointment::new(
        "Planvergadering",
        "Onze aankomende meeting verschuift. Nieuwe afspraak:",
        begin,
        begin + Duration::minutes(30),
        "https://teams.microsoft.com/l/channel/abc",
    )
    .unwrap()
}

#[tokio::test]
async fn posts_card_as_json_and_reports_success() {
    let (url, server) = spawn_webhook("202 Accepted", "").await;
    let notifier = notifier(url);

    let outcome = notifier.send(&appointment(), Utc::now()).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered { status: 202 });

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /workflows/reminder"));
    assert!(request.to_lowercase().contains("content-type: application/json"));
    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    let content = &json["attachments"][0]["content"];
    assert_eq!(json["type"], "Message");
    assert_eq!(content["type"], "AdaptiveCard");
    assert_eq!(content["body"][0]["text"], "Planvergadering");
    assert_eq!(content["body"][2]["facts"][1]["value"], "14:30");
    assert_eq!(content["body"][2]["facts"][2]["title"], "Einde");
    assert_eq!(content["actions"][0]["type"], "Action.OpenUrl");
    assert_eq!(content["actions"][0]["url"], "https://teams.microsoft.com/l/channel/abc");
}

#[tokio::test]
async fn server_error_keeps_status_and_body_verbatim() {
    let body = r#"{"error":{"code":"WorkflowTriggerIsNotEnabled","message":"disabled"}}"#;
    let (url, server) = spawn_webhook("500 Internal Server Error", body).await;
    let notifier = notifier(url);

    let outcome = notifier.send(&appointment(), Utc::now()).await;
    server.await.unwrap();
    assert_eq!(
        outcome,
        DeliveryOutcome::Rejected {
            status: 500,
            body: body.to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_reported_not_raised() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let notifier = notifier(Url::parse(&format!("http://{}/hook", addr)).unwrap());

    let outcome = notifier.send(&appointment(), Utc::now()).await;
    assert!(matches!(outcome, DeliveryOutcome::Failed { .. }));
}
