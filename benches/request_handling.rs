use async_trait::async_trait;
use comply_nav::agents::context::AppContext;
use comply_nav::agents::core::{parse_step, PromptBuilder};
use comply_nav::agents::error::LlmResult;
use comply_nav::agents::llm::LanguageModel;
use comply_nav::agents::service::QueryRequest;
use comply_nav::agents::{Turn, TurnRole};
use comply_nav::config::Settings;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

/// Picks the SQL tool once, then answers with whatever it observed
struct SqlThenAnswer;

#[async_trait]
impl LanguageModel for SqlThenAnswer {
    fn name(&self) -> &str {
        "bench"
    }

    fn model(&self) -> &str {
        "bench-1"
    }

    async fn complete(&self, _prompt: &str, context: &[Turn]) -> LlmResult<String> {
        match context.last() {
            Some(turn) if turn.role == TurnRole::ToolObservation => {
                Ok(format!("Final Answer: {}", turn.text))
            }
            _ => Ok("Thought: needs SQL\nAction: SQL_Query_Generator\nAction Input: customers table schema"
                .to_string()),
        }
    }
}

fn create_test_context() -> AppContext {
    AppContext::new(Settings::default(), Arc::new(SqlThenAnswer)).unwrap()
}

fn benchmark_parse_step(c: &mut Criterion) {
    let action = "Thought: the user wants a schema\nAction: SQL_Query_Generator\nAction Input: \"customers table schema\"";
    let answer = "Thought: done\nFinal Answer: SELECT * FROM customers;\nIt lists every column.";

    c.bench_function("parse_action", |b| b.iter(|| parse_step(black_box(action))));
    c.bench_function("parse_final_answer", |b| b.iter(|| parse_step(black_box(answer))));
}

fn benchmark_decision_prompt(c: &mut Criterion) {
    let ctx = create_test_context();
    let builder = PromptBuilder::new(None).unwrap();
    let tools = ctx.registry.infos();

    c.bench_function("decision_prompt", |b| {
        b.iter(|| builder.decision_prompt(black_box(&tools), black_box("show me the customers table")))
    });
}

fn benchmark_query_throughput(c: &mut Criterion) {
    let ctx = create_test_context();
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Elements(1));

    group.bench_function("queries_per_second", |b| {
        b.iter(|| {
            rt.block_on(async {
                let request = QueryRequest::new("show me the schema of the customers table")
                    .with_session("bench");
                let response = ctx.service.handle(black_box(request)).await;
                ctx.service.clear_session("bench").await;
                response
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_step,
    benchmark_decision_prompt,
    benchmark_query_throughput
);
criterion_main!(benches);
