use noticeboard_client::{
    ClientError, StreamState,
    config::Config as ClientConfig,
    consumer,
    notes::{Author, Note, Title, noticeboard_client::NoticeboardClient},
};
use noticeboard_server::{
    config::Config as ServerConfig,
    models::{self, Author as ModelAuthor},
    serve_with_shutdown,
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tonic::{Code, Request, transport::Channel};

struct TestServer {
    addr: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), tonic::transport::Error>>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve_with_shutdown(listener, &config, async {
                let _ = rx.await;
            })
            .await
        });

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    async fn seeded() -> Self {
        Self::start(ServerConfig::default()).await
    }

    async fn client(&self) -> NoticeboardClient<Channel> {
        consumer::connect(self.addr.clone()).await.unwrap()
    }

    fn client_config(&self, title: &str, author_mail: &str) -> ClientConfig {
        ClientConfig {
            server_addr: self.addr.clone(),
            title: title.to_string(),
            author_mail: author_mail.to_string(),
        }
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down within 5s")
            .unwrap()
            .unwrap();
    }
}

async fn stream_titles(client: &mut NoticeboardClient<Channel>, author: Author) -> Vec<String> {
    let mut stream = client
        .list_notes_by_author(Request::new(author))
        .await
        .unwrap()
        .into_inner();

    let mut titles = Vec::new();
    while let Some(note) = stream.message().await.unwrap() {
        titles.push(note.title);
    }
    titles
}

fn mail_filter(mail: &str) -> Author {
    Author {
        nickname: String::new(),
        mail: mail.to_string(),
    }
}

#[tokio::test]
async fn lookup_returns_every_stored_note() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    for stored in ServerConfig::default().store().notes() {
        let note = consumer::get_note_by_title(&mut client, &stored.title)
            .await
            .unwrap();

        assert_eq!(note.title, stored.title);
        assert_eq!(note.content, stored.content);
        let author = note.author.unwrap();
        assert_eq!(author.nickname, stored.author.nickname);
        assert_eq!(author.mail, stored.author.mail);
    }

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn lookup_of_what_up() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    let note = client
        .get_note_by_title(Request::new(Title {
            title: "What up".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(note.content, "This note says what up.");

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn lookup_of_absent_title_is_not_found() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    match consumer::get_note_by_title(&mut client, "Nonexistent").await {
        Err(ClientError::Lookup(status)) => {
            assert_eq!(status.code(), Code::NotFound);
            assert_eq!(status.message(), "note not found");
        }
        other => panic!("unexpected lookup result: {other:?}"),
    }

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn stream_yields_matches_in_store_order() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    let titles = stream_titles(&mut client, mail_filter("hans@gmail.com")).await;
    assert_eq!(titles, ["Hello", "Goodbye"]);

    let titles = stream_titles(&mut client, mail_filter("lisa@gmail.com")).await;
    assert_eq!(titles, ["What up"]);

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn stream_without_match_is_empty() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    assert!(
        stream_titles(&mut client, mail_filter("nobody@x.com"))
            .await
            .is_empty()
    );

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn stream_ignores_nickname() {
    let server = TestServer::seeded().await;
    let mut client = server.client().await;

    let titles = stream_titles(
        &mut client,
        Author {
            nickname: "Lisa".to_string(),
            mail: "hans@gmail.com".to_string(),
        },
    )
    .await;

    assert_eq!(titles, ["Hello", "Goodbye"]);

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn receiver_gets_every_note_exactly_once() {
    let prolific = ModelAuthor::new("Ann", "ann@example.com");
    let other = ModelAuthor::new("Bob", "bob@example.com");
    let notes: Vec<models::Note> = (0..60)
        .map(|i| {
            let author = if i % 3 == 0 { &other } else { &prolific };
            models::Note::new(format!("note {i}"), format!("body {i}"), author.clone())
        })
        .collect();
    let expected: Vec<String> = notes
        .iter()
        .filter(|n| n.author.mail == "ann@example.com")
        .map(|n| n.title.clone())
        .collect();

    let server = TestServer::start(ServerConfig {
        stream_buffer: 1,
        notes: Some(notes),
        ..ServerConfig::default()
    })
    .await;
    let mut client = server.client().await;

    let (state, stream) = consumer::open_stream(&mut client, "ann@example.com", StreamState::Idle)
        .await
        .unwrap();
    assert_eq!(state, StreamState::StreamOpened);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let done = consumer::spawn_receiver(state, stream, move |note: &Note| {
        sink.lock().unwrap().push(note.title.clone());
    });

    let received: Vec<String> = consumer::wait_for_completion(done)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();

    assert_eq!(received.len(), 40);
    assert_eq!(received, expected);
    assert_eq!(*seen.lock().unwrap(), expected);

    drop(client);
    server.stop().await;
}

#[tokio::test]
async fn run_performs_lookup_then_stream() {
    let server = TestServer::seeded().await;
    let config = server.client_config("What up", "hans@gmail.com");

    let events = Arc::new(Mutex::new(Vec::new()));
    let streamed = Arc::clone(&events);

    let report = consumer::run(
        &config,
        |note: &Note| events.lock().unwrap().push(format!("lookup {}", note.title)),
        move |note: &Note| streamed.lock().unwrap().push(format!("stream {}", note.title)),
    )
    .await
    .unwrap();

    assert_eq!(report.lookup.content, "This note says what up.");
    let titles: Vec<&str> = report.streamed.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["Hello", "Goodbye"]);
    assert_eq!(
        *events.lock().unwrap(),
        ["lookup What up", "stream Hello", "stream Goodbye"]
    );

    server.stop().await;
}

#[tokio::test]
async fn run_aborts_on_failed_lookup() {
    let server = TestServer::seeded().await;
    let config = server.client_config("Nonexistent", "hans@gmail.com");

    let err = consumer::run(&config, |_: &Note| {}, |_: &Note| {}).await.unwrap_err();
    assert!(matches!(err, ClientError::Lookup(status) if status.code() == Code::NotFound));

    server.stop().await;
}

#[tokio::test]
async fn run_fails_without_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = ClientConfig {
        server_addr: addr,
        ..ClientConfig::default()
    };

    let err = consumer::run(&config, |_: &Note| {}, |_: &Note| {}).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
