use super::fixtures::{context_with, test_settings, ScriptedModel};
use comply_nav::agents::context::AppContext;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub ctx: AppContext,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_model(Arc::new(ScriptedModel::new(vec!["Final Answer: ok"]))).await
    }

    pub async fn with_model(model: Arc<ScriptedModel>) -> Self {
        let ctx = context_with(model, test_settings());
        let app = comply_nav::create_app(ctx.clone());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer { addr, base_url, ctx }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
