use crate::postgres::{self, Row};
use crate::value::RawValue;

#[derive(Debug, Default, Clone)]
pub struct TestConnection {
    prepare_results: Vec<Result<(), ErrorDetails>>,
    query_results: Vec<Result<Vec<Row>, ErrorDetails>>,
    execute_results: Vec<Result<u64, ErrorDetails>>,
    records: Vec<Record>,
    next_statement: usize,
}

impl TestConnection {
    pub fn new() -> Self {
        TestConnection::default()
    }

    pub fn push_prepare_result(&mut self, result: Result<(), ErrorDetails>) {
        self.prepare_results.push(result);
    }

    pub fn push_query_result(&mut self, result: Result<Vec<Row>, ErrorDetails>) {
        self.query_results.push(result);
    }

    pub fn push_execute_result(&mut self, result: Result<u64, ErrorDetails>) {
        self.execute_results.push(result);
    }

    pub fn records(&self) -> &[Record] {
        &self.records[..]
    }
}

/// A row of text columns, `None` for NULL.
pub fn row(columns: &[(&str, Option<&str>)]) -> Row {
    let names = columns.iter().map(|(name, _)| name.to_string()).collect();
    let values = columns
        .iter()
        .map(|(_, value)| value.map(RawValue::text))
        .collect();
    Row::new(names, values)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub params: Vec<Option<RawValue>>,
    pub kind: Kind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Prepare,
    Query,
    Execute,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: String,
}

impl ErrorDetails {
    pub fn new(message: &str) -> Self {
        ErrorDetails {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorDetails {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStatement {
    pub id: usize,
    pub text: String,
}

impl postgres::Connection for TestConnection {
    type Statement = TestStatement;
    type Error = ErrorDetails;

    fn prepare(&mut self, query_text: &str) -> Result<TestStatement, ErrorDetails> {
        self.records.push(Record {
            text: query_text.into(),
            params: vec![],
            kind: Kind::Prepare,
        });
        self.prepare_results.pop().unwrap_or(Ok(()))?;

        self.next_statement += 1;
        Ok(TestStatement {
            id: self.next_statement,
            text: query_text.into(),
        })
    }

    fn query(
        &mut self,
        statement: &TestStatement,
        params: &[Option<RawValue>],
    ) -> Result<Vec<Row>, ErrorDetails> {
        self.records.push(Record {
            text: statement.text.clone(),
            params: params.to_vec(),
            kind: Kind::Query,
        });
        self.query_results.pop().unwrap_or_else(|| Ok(vec![]))
    }

    fn execute(
        &mut self,
        statement: &TestStatement,
        params: &[Option<RawValue>],
    ) -> Result<u64, ErrorDetails> {
        self.records.push(Record {
            text: statement.text.clone(),
            params: params.to_vec(),
            kind: Kind::Execute,
        });
        self.execute_results.pop().unwrap_or(Ok(0))
    }
}

pub type Client = postgres::Client<TestConnection>;
pub type Error = postgres::Error<TestConnection>;
