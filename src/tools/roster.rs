//! Student-roster importer and house query, backed by its own SQLite file.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Roster database handle.
pub struct RosterDb {
    pool: SqlitePool,
}

/// One student row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub first: String,
    pub middle: Option<String>,
    pub last: String,
    pub house: String,
    pub birth: i64,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.middle {
            Some(middle) => write!(
                f,
                "{} {} {}, born {}",
                self.first, middle, self.last, self.birth
            ),
            None => write!(f, "{} {}, born {}", self.first, self.last, self.birth),
        }
    }
}

/// Split a full name into first/middle/last; two tokens mean no middle name.
pub fn split_name(name: &str) -> (String, Option<String>, String) {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [first, middle, last] => (first.to_string(), Some(middle.to_string()), last.to_string()),
        [first, last] => (first.to_string(), None, last.to_string()),
        _ => (name.trim().to_string(), None, String::new()),
    }
}

impl RosterDb {
    /// Open (or create) the roster database and apply migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Throwaway in-memory roster for tests; see `Database::in_memory`.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to open roster database")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first TEXT NOT NULL,
                middle TEXT,
                last TEXT NOT NULL,
                house TEXT NOT NULL,
                birth INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Import students from CSV data with a `name,house,birth` header.
    /// Returns how many rows were inserted.
    pub async fn import<R: Read>(&self, csv_data: R) -> Result<usize> {
        let mut reader = csv::Reader::from_reader(csv_data);
        let mut inserted = 0;

        for record in reader.records() {
            let record = record.context("Failed to read roster row")?;
            let name = record.get(0).context("Roster row missing name")?;
            let house = record.get(1).context("Roster row missing house")?;
            let birth: i64 = record
                .get(2)
                .context("Roster row missing birth year")?
                .trim()
                .parse()
                .with_context(|| format!("Bad birth year for {}", name))?;

            let (first, middle, last) = split_name(name);

            sqlx::query(
                "INSERT INTO students (first, middle, last, house, birth) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(first)
            .bind(middle)
            .bind(last)
            .bind(house)
            .bind(birth)
            .execute(&self.pool)
            .await?;

            inserted += 1;
        }

        Ok(inserted)
    }

    /// Import students from a CSV file on disk.
    pub async fn import_file(&self, path: &Path) -> Result<usize> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        self.import(file).await
    }

    /// Students in a house, ordered by last then first name.
    pub async fn house(&self, house: &str) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE house = ? ORDER BY last, first",
        )
        .bind(house)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
name,house,birth
Adelaide Murton,Slytherin,1982
Colin Creevey,Gryffindor,1981
Harry James Potter,Gryffindor,1980
Hermione Jean Granger,Gryffindor,1979
";

    #[test]
    fn test_split_name_with_and_without_middle() {
        assert_eq!(
            split_name("Harry James Potter"),
            (
                "Harry".to_string(),
                Some("James".to_string()),
                "Potter".to_string()
            )
        );
        assert_eq!(
            split_name("Colin Creevey"),
            ("Colin".to_string(), None, "Creevey".to_string())
        );
    }

    #[tokio::test]
    async fn test_import_and_house_query() {
        let db = RosterDb::in_memory().await.unwrap();

        let inserted = db.import(ROSTER.as_bytes()).await.unwrap();
        assert_eq!(inserted, 4);

        let gryffindor = db.house("Gryffindor").await.unwrap();
        let lines: Vec<String> = gryffindor.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Colin Creevey, born 1981",
                "Hermione Jean Granger, born 1979",
                "Harry James Potter, born 1980",
            ]
        );

        assert!(db.house("Hufflepuff").await.unwrap().is_empty());
    }
}
