//! End-to-end protocol scenarios against a live session over localhost
//! sockets.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use fwdftpd::core_datasource::stub::{StubSource, TEST_DATA};
use fwdftpd::session::Session;

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    /// Spawns a dispatcher on an ephemeral port and connects to it,
    /// consuming the greeting banner.
    async fn connect() -> Client {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut session = Session::new(Ipv4Addr::LOCALHOST, socket, Arc::new(StubSource));
            let _ = session.dispatch().await;
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = Client {
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        assert_eq!(client.read_reply().await, "220 nUl1 FWD Server");
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn read_reply(&mut self) -> String {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a reply")
            .unwrap();
        assert!(n > 0, "control channel closed early");
        line.trim_end().to_string()
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.read_reply().await
    }

    /// Issues PASV and opens the advertised data connection.
    async fn open_data_channel(&mut self) -> TcpStream {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 Passive ready ("), "got: {}", reply);
        let port = parse_pasv_port(&reply);
        TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap()
    }

    /// Reads until EOF or an error; either way the channel is gone.
    async fn expect_closed(&mut self) {
        let mut rest = String::new();
        let closed = timeout(Duration::from_secs(5), self.reader.read_line(&mut rest))
            .await
            .expect("timed out waiting for the channel to close");
        assert!(matches!(closed, Ok(0) | Err(_)), "channel still open");
    }
}

fn parse_pasv_port(reply: &str) -> u16 {
    let inner = reply
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner)
        .expect("malformed PASV reply");
    let fields: Vec<u16> = inner.split(',').map(|f| f.parse().unwrap()).collect();
    assert_eq!(fields.len(), 6);
    fields[4] * 256 + fields[5]
}

#[tokio::test]
async fn greeting_and_login() {
    let mut client = Client::connect().await;
    assert_eq!(
        client.cmd("USER fwd").await,
        "331 Okay, give me your fancy string"
    );
    assert_eq!(client.cmd("PASS anything").await, "230 Whatever");
}

#[tokio::test]
async fn rejects_unknown_users() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("USER anonymous").await, "530 Not today");
}

#[tokio::test]
async fn verbs_are_case_insensitive() {
    let mut client = Client::connect().await;
    assert_eq!(
        client.cmd("user fwd").await,
        "331 Okay, give me your fancy string"
    );
}

#[tokio::test]
async fn unknown_verb_drops_the_session() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("FOO").await, "502 Not implemented");
    client.expect_closed().await;
}

#[tokio::test]
async fn syst_and_pwd() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("SYST").await, "215 UNIX");
    assert_eq!(client.cmd("PWD").await, "257 \"/\"");
}

#[tokio::test]
async fn feat_lists_extensions() {
    let mut client = Client::connect().await;
    client.send("FEAT").await;
    assert_eq!(client.read_reply().await, "211-Features:");
    let mut features = Vec::new();
    loop {
        let line = client.read_reply().await;
        if line == "211 End" {
            break;
        }
        features.push(line);
    }
    assert_eq!(
        features,
        [" EPSV", " MDTM", " REST STREAM", " SIZE", " TVFS", " UTF8"]
    );
}

#[tokio::test]
async fn opts_only_knows_utf8() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("OPTS").await, "501 Option required");
    assert_eq!(client.cmd("OPTS UTF8").await, "200 Always on");
    assert_eq!(client.cmd("OPTS utf8 on").await, "200 Always on");
    assert_eq!(client.cmd("OPTS UTF8 OFF").await, "501 Always on");
    assert_eq!(client.cmd("OPTS MLST size").await, "501 Unknown option");
}

#[tokio::test]
async fn type_accepts_binary_only() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("TYPE I").await, "200 OK");
    assert_eq!(client.cmd("TYPE A").await, "504 Unsupported type");
}

#[tokio::test]
async fn cwd_navigates_known_paths() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("CWD /").await, "200 \"/\"");
    assert_eq!(client.cmd("CWD //").await, "200 \"/\"");
    assert_eq!(client.cmd("CWD /nope").await, "550 Unknown");
    assert_eq!(client.cmd("PWD").await, "257 \"/\"");
}

#[tokio::test]
async fn size_reports_the_stub_resource() {
    let mut client = Client::connect().await;
    assert_eq!(
        client.cmd("SIZE /test.txt").await,
        format!("213 {}", TEST_DATA.len())
    );
    assert_eq!(client.cmd("SIZE test.txt").await, format!("213 {}", TEST_DATA.len()));
    assert_eq!(client.cmd("SIZE /missing").await, "550 Unknown");
}

#[tokio::test]
async fn mdtm_reports_the_epoch() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("MDTM /test.txt").await, "213 19700101000000");
    assert_eq!(client.cmd("MDTM /missing").await, "550 Unknown");
}

#[tokio::test]
async fn list_streams_the_directory() {
    let mut client = Client::connect().await;
    assert_eq!(
        client.cmd("USER fwd").await,
        "331 Okay, give me your fancy string"
    );
    assert_eq!(client.cmd("PASS x").await, "230 Whatever");

    let mut data = client.open_data_channel().await;
    assert_eq!(client.cmd("LIST").await, "150 Listing");

    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert_eq!(
        listing,
        format!(
            "-r--r--r-- 2 fwd fwd {} Jan  1 1970 test.txt\r\n",
            TEST_DATA.len()
        )
    );
    assert_eq!(client.read_reply().await, "226 Transfer done");
}

#[tokio::test]
async fn retr_round_trip() {
    let mut client = Client::connect().await;
    let mut data = client.open_data_channel().await;
    assert_eq!(client.cmd("RETR /test.txt").await, "150 Starting transfer");

    let mut body = Vec::new();
    data.read_to_end(&mut body).await.unwrap();
    assert_eq!(body, TEST_DATA);
    assert_eq!(client.read_reply().await, "226 Transfer done");
}

#[tokio::test]
async fn retr_of_a_missing_file() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("RETR /missing").await, "550 Unknown");
}

#[tokio::test]
async fn rest_offsets_exactly_one_retr() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("REST 5").await, "350 Duly noted");

    let mut data = client.open_data_channel().await;
    assert_eq!(client.cmd("RETR /test.txt").await, "150 Starting transfer");
    let mut body = Vec::new();
    data.read_to_end(&mut body).await.unwrap();
    assert_eq!(body, &TEST_DATA[5..]);
    assert_eq!(client.read_reply().await, "226 Transfer done");

    // The offset was consumed: the next RETR starts from zero again.
    let mut data = client.open_data_channel().await;
    assert_eq!(client.cmd("RETR /test.txt").await, "150 Starting transfer");
    let mut body = Vec::new();
    data.read_to_end(&mut body).await.unwrap();
    assert_eq!(body, TEST_DATA);
    assert_eq!(client.read_reply().await, "226 Transfer done");
}

#[tokio::test]
async fn abor_without_a_transfer() {
    let mut client = Client::connect().await;
    assert_eq!(client.cmd("ABOR").await, "226 No active transfer");
}

#[tokio::test]
async fn epsv_advertises_the_port() {
    let mut client = Client::connect().await;
    let reply = client.cmd("EPSV").await;
    let port: u16 = reply
        .strip_prefix("229 Passive ready (|||")
        .and_then(|rest| rest.strip_suffix("|)"))
        .expect("malformed EPSV reply")
        .parse()
        .unwrap();

    let mut data = TcpStream::connect((Ipv4Addr::LOCALHOST, port))
        .await
        .unwrap();
    assert_eq!(client.cmd("LIST").await, "150 Listing");
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert!(listing.contains("test.txt"));
    assert_eq!(client.read_reply().await, "226 Transfer done");
}

#[tokio::test]
async fn quit_closes_without_a_reply() {
    let mut client = Client::connect().await;
    client.send("QUIT").await;
    client.expect_closed().await;
}
