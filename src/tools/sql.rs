//! Natural-language to SQL tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::domain::{Tool, ToolError};

pub const SQL_TOOL_NAME: &str = "SQL_Query_Generator";

/// SQL dialects the generator can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    PostgreSql,
    MySql,
    SqlServer,
    Snowflake,
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SqlDialect::PostgreSql => "postgresql",
            SqlDialect::MySql => "mysql",
            SqlDialect::SqlServer => "sqlserver",
            SqlDialect::Snowflake => "snowflake",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SqlDialect {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(SqlDialect::PostgreSql),
            "mysql" => Ok(SqlDialect::MySql),
            "sqlserver" => Ok(SqlDialect::SqlServer),
            "snowflake" => Ok(SqlDialect::Snowflake),
            other => Err(ToolError::InvalidInput(format!("Unsupported SQL dialect: {}", other))),
        }
    }
}

/// Generated query plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub sql: String,
    pub dialect: SqlDialect,
    pub tables: Vec<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryValidation {
    pub valid: bool,
    pub issues: Vec<String>,
    pub suggested_optimizations: Vec<String>,
}

/// Placeholder SQL generator. Real translation is out of scope; the output
/// shape is what callers depend on.
#[derive(Debug, Clone, Default)]
pub struct SqlAgent {
    dialect: SqlDialect,
}

impl SqlAgent {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn generate_query(&self, natural_query: &str, dialect: SqlDialect) -> Result<GeneratedQuery, ToolError> {
        let natural_query = natural_query.trim();
        if natural_query.is_empty() {
            return Err(ToolError::InvalidInput("query text is empty".to_string()));
        }

        Ok(GeneratedQuery {
            sql: format!(
                "-- Generated SQL for: {}\nSELECT * FROM table WHERE condition;",
                natural_query
            ),
            dialect,
            tables: vec!["table".to_string()],
            confidence: 0.85,
        })
    }

    pub fn validate_query(&self, _sql: &str) -> QueryValidation {
        QueryValidation {
            valid: true,
            issues: Vec::new(),
            suggested_optimizations: Vec::new(),
        }
    }
}

#[async_trait]
impl Tool for SqlAgent {
    fn name(&self) -> &str {
        SQL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Converts natural language to SQL queries"
    }

    async fn invoke(&self, input: &str) -> Result<Value, ToolError> {
        let generated = self.generate_query(input, self.dialect)?;
        tracing::debug!(dialect = %generated.dialect, "Generated placeholder SQL");
        Ok(Value::String(generated.sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invoke_returns_placeholder_sql() {
        let agent = SqlAgent::default();
        let output = agent.invoke("customers table schema").await.unwrap();
        assert_eq!(
            output,
            Value::String(
                "-- Generated SQL for: customers table schema\nSELECT * FROM table WHERE condition;".into()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let err = SqlAgent::default().invoke("   ").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_dialects() {
        assert_eq!("Snowflake".parse::<SqlDialect>().unwrap(), SqlDialect::Snowflake);
        assert_eq!(SqlDialect::default().to_string(), "postgresql");
        assert!("oracle".parse::<SqlDialect>().is_err());

        let query = SqlAgent::default()
            .generate_query("revenue by region", SqlDialect::MySql)
            .unwrap();
        assert_eq!(query.dialect, SqlDialect::MySql);
        assert_eq!(query.tables, vec!["table"]);
    }

    #[test]
    fn test_validate_query_placeholder() {
        let validation = SqlAgent::default().validate_query("SELECT 1");
        assert!(validation.valid);
        assert!(validation.issues.is_empty());
    }
}
