//! In-process HTTP stub and stateful Qdrant/Milvus fakes for driver tests

use ragway_core::store::cosine_similarity;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// One request as the stub saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including any query string
    pub path: String,
    /// Lowercased names
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Handler = dyn Fn(&RecordedRequest) -> (u16, Value) + Send + Sync;

/// HTTP/1.1 server on an ephemeral port answering every request with `handler`
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, Value) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let url = format!("http://{}", listener.local_addr().expect("stub addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = serve_connection(stream, handler, recorded).await;
                });
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD path"` for every request so far, in arrival order
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

async fn serve_connection(
    stream: TcpStream,
    handler: Arc<Handler>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    // Keep-alive: answer requests until the client hangs up
    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await? == 0 {
            return Ok(());
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).await?;

        let request = RecordedRequest {
            method,
            path,
            headers,
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        };
        let (status, reply) = handler(&request);
        recorded.lock().unwrap().push(request);

        let payload = reply.to_string();
        let response = format!(
            "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            status,
            payload.len(),
            payload
        );
        reader.get_mut().write_all(response.as_bytes()).await?;
        reader.get_mut().flush().await?;
    }
}

fn floats(value: &Value) -> Vec<f32> {
    value
        .as_array()
        .map(|a| a.iter().filter_map(|x| x.as_f64()).map(|x| x as f32).collect())
        .unwrap_or_default()
}

/// Rank `(item, vector)` pairs by cosine similarity to `query`, best first
fn rank<'a, T>(items: impl Iterator<Item = (&'a T, &'a [f32])>, query: &[f32]) -> Vec<(&'a T, f32)>
where
    T: 'a,
{
    let mut scored: Vec<(&T, f32)> = items
        .map(|(item, vector)| (item, cosine_similarity(vector, query)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

struct QdrantPoint {
    id: Value,
    vector: Vec<f32>,
    payload: Value,
}

#[derive(Default)]
struct QdrantState {
    exists: bool,
    points: Vec<QdrantPoint>,
}

/// Qdrant REST surface for the `documents` collection, cosine only
#[derive(Default)]
pub struct FakeQdrant {
    state: Mutex<QdrantState>,
}

impl FakeQdrant {
    pub fn with_collection() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().exists = true;
        fake
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().points.len()
    }

    pub fn handle(&self, req: &RecordedRequest) -> (u16, Value) {
        const PREFIX: &str = "/collections/documents";
        let mut state = self.state.lock().unwrap();

        if req.method == "GET" && req.path == "/readyz" {
            return (200, json!({ "title": "ready" }));
        }
        if req.method == "GET" && req.path == format!("{}/exists", PREFIX) {
            return (200, json!({ "result": { "exists": state.exists }, "status": "ok" }));
        }
        if req.method == "PUT" && req.path == PREFIX {
            if state.exists {
                return (
                    409,
                    json!({ "status": { "error": "Wrong input: Collection `documents` already exists!" } }),
                );
            }
            state.exists = true;
            return (200, json!({ "result": true, "status": "ok" }));
        }
        if !state.exists {
            return (
                404,
                json!({ "status": { "error": "Not found: Collection `documents` doesn't exist!" } }),
            );
        }

        let route = req.path.strip_prefix(PREFIX).unwrap_or_default();
        match (req.method.as_str(), route) {
            ("PUT", "/points?wait=true") => {
                for point in req.body["points"].as_array().cloned().unwrap_or_default() {
                    state.points.retain(|p| p.id != point["id"]);
                    state.points.push(QdrantPoint {
                        id: point["id"].clone(),
                        vector: floats(&point["vector"]),
                        payload: point["payload"].clone(),
                    });
                }
                (200, json!({ "result": { "status": "completed" }, "status": "ok" }))
            }
            ("POST", "/points/delete?wait=true") => {
                state.points.clear();
                (200, json!({ "result": { "status": "completed" }, "status": "ok" }))
            }
            ("POST", "/points/search") => {
                let query = floats(&req.body["vector"]);
                let limit = req.body["limit"].as_u64().unwrap_or(10) as usize;
                let threshold = req.body["score_threshold"].as_f64().map(|t| t as f32);
                let hits: Vec<Value> = rank(
                    state.points.iter().map(|p| (p, p.vector.as_slice())),
                    &query,
                )
                .into_iter()
                .filter(|(_, score)| threshold.map_or(true, |t| *score >= t))
                .take(limit)
                .map(|(p, score)| json!({ "id": p.id, "score": score, "payload": p.payload }))
                .collect();
                (200, json!({ "result": hits, "status": "ok" }))
            }
            ("POST", "/points/count") => (
                200,
                json!({ "result": { "count": state.points.len() }, "status": "ok" }),
            ),
            _ => (404, json!({ "status": { "error": "unknown route" } })),
        }
    }
}

#[derive(Default)]
struct MilvusState {
    has: bool,
    indexed: bool,
    loaded: bool,
    entities: Vec<(Value, Vec<f32>)>,
}

/// Milvus RESTful v2 surface for one collection, cosine only
#[derive(Default)]
pub struct FakeMilvus {
    state: Mutex<MilvusState>,
}

fn milvus_ok(data: Value) -> (u16, Value) {
    (200, json!({ "code": 0, "data": data }))
}

fn milvus_err(code: i64, message: &str) -> (u16, Value) {
    (200, json!({ "code": code, "message": message }))
}

impl FakeMilvus {
    /// Collection created, indexed and loaded
    pub fn ready() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.has = true;
            state.indexed = true;
            state.loaded = true;
        }
        fake
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entities.len()
    }

    pub fn handle(&self, req: &RecordedRequest) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        let Some(path) = req.path.strip_prefix("/v2/vectordb/") else {
            return (404, json!({ "message": "unknown route" }));
        };

        match path {
            "collections/list" => milvus_ok(json!(["documents"])),
            "collections/has" => milvus_ok(json!({ "has": state.has })),
            "collections/create" => {
                if state.has {
                    return milvus_err(65535, "collection already exists: documents");
                }
                state.has = true;
                milvus_ok(json!({}))
            }
            "indexes/describe" => {
                if state.indexed {
                    milvus_ok(json!([{ "indexName": "embedding_index", "fieldName": "embedding" }]))
                } else {
                    milvus_ok(json!([]))
                }
            }
            "indexes/create" => {
                state.indexed = true;
                milvus_ok(json!({}))
            }
            "collections/load" => {
                if !state.indexed {
                    return milvus_err(700, "index not found");
                }
                state.loaded = true;
                milvus_ok(json!({}))
            }
            _ if !state.has => milvus_err(100, "collection not found[collection=documents]"),
            "entities/upsert" => {
                let data = req.body["data"].as_array().cloned().unwrap_or_default();
                for entity in &data {
                    state.entities.retain(|(e, _)| e["id"] != entity["id"]);
                    state.entities.push((entity.clone(), floats(&entity["embedding"])));
                }
                milvus_ok(json!({ "upsertCount": data.len() }))
            }
            "entities/delete" => {
                state.entities.clear();
                milvus_ok(json!({}))
            }
            "entities/search" => {
                if !state.loaded {
                    return milvus_err(101, "collection not loaded");
                }
                let query = floats(&req.body["data"][0]);
                let limit = req.body["limit"].as_u64().unwrap_or(10) as usize;
                let hits: Vec<Value> = rank(
                    state.entities.iter().map(|(e, v)| (e, v.as_slice())),
                    &query,
                )
                .into_iter()
                .take(limit)
                .map(|(e, distance)| {
                    json!({
                        "id": e["id"],
                        "distance": distance,
                        "content": e["content"],
                        "metadata": e["metadata"],
                    })
                })
                .collect();
                milvus_ok(json!(hits))
            }
            "entities/query" => milvus_ok(json!([{ "count(*)": state.entities.len() }])),
            _ => (404, json!({ "message": "unknown route" })),
        }
    }
}
