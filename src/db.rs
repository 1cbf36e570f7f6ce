use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::ScrapeError;

/// Recorded in the `programmer` column of every article row.
pub const PROGRAMMER: &str = "wired_scraper";

/// One article, built up during extraction and written once.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub source: String,
    pub url: String,
    pub parse_date: NaiveDate,
    pub pub_date: Option<NaiveDate>,
    pub author: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    /// Consolidated body text, segments joined with single spaces.
    pub body: String,
    /// Filled by the segmenter before persisting; `sent_id` is 1-based.
    pub sentences: Vec<String>,
}

pub fn connect(path: &std::path::Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            docid      INTEGER PRIMARY KEY,
            resource   TEXT NOT NULL,
            link       TEXT NOT NULL,
            parse_date TEXT NOT NULL,
            pubdate    TEXT,
            author     TEXT,
            title      TEXT NOT NULL,
            tags       TEXT,
            category   TEXT,
            programmer TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_articles_link ON articles(link);

        CREATE TABLE IF NOT EXISTS sents (
            docid   INTEGER NOT NULL REFERENCES articles(docid),
            sent_id INTEGER NOT NULL,
            sent    TEXT NOT NULL,
            PRIMARY KEY (docid, sent_id)
        );
        ",
    )?;
    Ok(())
}

/// Insert an article and all of its sentences in one transaction.
///
/// Either the article row and every sentence row land together, or the
/// transaction rolls back and nothing is visible. Returns the docid.
pub fn insert_article(
    conn: &Connection,
    record: &ArticleRecord,
) -> std::result::Result<i64, ScrapeError> {
    let tx = conn.unchecked_transaction()?;
    let docid;
    {
        let mut article_stmt = tx.prepare(
            "INSERT INTO articles
             (resource, link, parse_date, pubdate, author, title, tags, category, programmer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        article_stmt.execute(rusqlite::params![
            record.source,
            record.url,
            record.parse_date.to_string(),
            record.pub_date.map(|d| d.to_string()),
            record.author,
            record.title,
            record.tags,
            record.category,
            PROGRAMMER,
        ])?;
        docid = tx.last_insert_rowid();

        let mut sent_stmt =
            tx.prepare("INSERT INTO sents (docid, sent_id, sent) VALUES (?1, ?2, ?3)")?;
        for (i, sent) in record.sentences.iter().enumerate() {
            sent_stmt.execute(rusqlite::params![docid, i as i64 + 1, sent])?;
        }
    }
    tx.commit()?;
    Ok(docid)
}

// ── Stats ──

pub struct Stats {
    pub articles: usize,
    pub sentences: usize,
    pub tagged: usize,
    pub dated: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let articles: usize = conn.query_row("SELECT COUNT(*) FROM articles", [], |r| r.get(0))?;
    let sentences: usize = conn.query_row("SELECT COUNT(*) FROM sents", [], |r| r.get(0))?;
    let tagged: usize = conn.query_row(
        "SELECT COUNT(*) FROM articles WHERE tags IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let dated: usize = conn.query_row(
        "SELECT COUNT(*) FROM articles WHERE pubdate IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        articles,
        sentences,
        tagged,
        dated,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            source: "Wired.com".to_string(),
            url: "https://www.wired.com/story/example/".to_string(),
            parse_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            pub_date: NaiveDate::from_ymd_opt(2020, 1, 2),
            author: Some("John Doe".to_string()),
            title: "Example".to_string(),
            category: Some("Security".to_string()),
            tags: Some("security;privacy".to_string()),
            body: "Hello world. Goodbye world.".to_string(),
            sentences: vec!["Hello world.".to_string(), "Goodbye world.".to_string()],
        }
    }

    fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_round_trip() {
        let conn = memory_conn();
        let docid = insert_article(&conn, &sample_record()).unwrap();

        let (link, author, pubdate): (String, String, String) = conn
            .query_row(
                "SELECT link, author, pubdate FROM articles WHERE docid = ?1",
                [docid],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(link, "https://www.wired.com/story/example/");
        assert_eq!(author, "John Doe");
        assert_eq!(pubdate, "2020-01-02");

        let mut stmt = conn
            .prepare("SELECT sent_id, sent FROM sents WHERE docid = ?1 ORDER BY sent_id")
            .unwrap();
        let sents: Vec<(i64, String)> = stmt
            .query_map([docid], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            sents,
            vec![
                (1, "Hello world.".to_string()),
                (2, "Goodbye world.".to_string())
            ]
        );
    }

    #[test]
    fn sentence_failure_rolls_back_article() {
        let conn = memory_conn();
        // Force the sentence inserts to fail after the article insert succeeds.
        conn.execute_batch("DROP TABLE sents").unwrap();

        let result = insert_article(&conn, &sample_record());
        assert!(result.is_err());

        let articles: usize = conn
            .query_row("SELECT COUNT(*) FROM articles", [], |r| r.get(0))
            .unwrap();
        assert_eq!(articles, 0, "partial write must not leave an article row");
    }

    #[test]
    fn stats_counts() {
        let conn = memory_conn();
        let mut rec = sample_record();
        insert_article(&conn, &rec).unwrap();
        rec.url = "https://www.wired.com/story/other/".to_string();
        rec.tags = None;
        rec.pub_date = None;
        insert_article(&conn, &rec).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.articles, 2);
        assert_eq!(stats.sentences, 4);
        assert_eq!(stats.tagged, 1);
        assert_eq!(stats.dated, 1);
    }
}
