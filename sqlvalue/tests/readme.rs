#![allow(dead_code)]

use std::collections::HashMap;

use sqlvalue::client::ToParam;
use sqlvalue::interval::{Component, PgInterval};
use sqlvalue::postgres::{Client, Connection, Error, Param, Row};
use sqlvalue::query::{Query, StaticQueryText, ToParams};
use sqlvalue::temporal::{PgDate, PgTimestamp};
use sqlvalue::value::{self, RawValue, ValueError};

/// A table of people in memory, answering the one query below.
#[derive(Default)]
struct People {
    birthdays: HashMap<String, String>,
}

#[derive(Debug)]
struct Unknown(String);

impl std::fmt::Display for Unknown {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "unknown statement {:?}", self.0)
    }
}

impl Connection for People {
    type Statement = String;
    type Error = Unknown;

    fn prepare(&mut self, query_text: &str) -> Result<String, Unknown> {
        if query_text == BirthdaysOn::QUERY_TEXT {
            Ok(query_text.into())
        } else {
            Err(Unknown(query_text.into()))
        }
    }

    fn query(&mut self, _: &String, params: &[Option<RawValue>]) -> Result<Vec<Row>, Unknown> {
        let day = params[0].as_ref().and_then(RawValue::as_text).unwrap_or_default();
        Ok(self
            .birthdays
            .iter()
            .filter(|(_, birthday)| birthday.as_str() == day)
            .map(|(name, _)| Row::new(vec!["name".into()], vec![Some(RawValue::text(name.as_str()))]))
            .collect())
    }

    fn execute(&mut self, statement: &String, _: &[Option<RawValue>]) -> Result<u64, Unknown> {
        Err(Unknown(statement.clone()))
    }
}

struct BirthdaysOn(PgDate);

impl StaticQueryText for BirthdaysOn {
    const QUERY_TEXT: &'static str = "SELECT name FROM people WHERE birthday = $1";
}

impl<C: Connection> ToParams<Client<C>> for BirthdaysOn {
    fn to_params(&self) -> Option<Vec<Param<'_>>> {
        Some(vec![ToParam::<Client<C>>::to_param(&self.0)])
    }
}

impl<C: Connection> Query<Client<C>> for BirthdaysOn {
    type Row = (String,);
}

fn birthdays<C: Connection>(client: &mut Client<C>) -> Result<Vec<String>, Error<C>> {
    let rows = client.query(&BirthdaysOn(PgDate::ymd(2000, 2, 29)))?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[test]
fn values() -> Result<(), ValueError> {
    let at: PgTimestamp = value::decode(&RawValue::text("2020-03-15 14:30:00.25+05:30"))?;
    assert_eq!("2020-03-15 14:30:00.250000000+0530", at.to_string());

    let every: PgInterval = "P1DT12H".parse()?;
    assert_eq!(12, every.get(Component::Hour));

    Ok(())
}

#[test]
fn queries() -> Result<(), Error<People>> {
    let mut people = People::default();
    people.birthdays.insert("Ann".into(), "2000-02-29".into());
    people.birthdays.insert("Bo".into(), "1999-03-01".into());

    let mut client = Client::new(people);
    assert_eq!(vec!["Ann".to_string()], birthdays(&mut client)?);

    Ok(())
}
