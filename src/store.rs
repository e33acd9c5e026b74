//! SQLite persistence for participants and messages.

use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions},
    Executor, Sqlite,
};

use crate::models::{Message, MessageEdit, NewMessage, Participant, BROADCAST};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS participants (
    name        TEXT PRIMARY KEY,
    last_status INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_participants_last_status ON participants(last_status);

CREATE TABLE IF NOT EXISTS messages (
    seq       INTEGER PRIMARY KEY AUTOINCREMENT,
    id        TEXT NOT NULL UNIQUE,
    from_name TEXT NOT NULL,
    to_name   TEXT NOT NULL,
    text      TEXT NOT NULL,
    kind      TEXT NOT NULL,
    time      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_to ON messages(to_name);
CREATE INDEX IF NOT EXISTS idx_messages_from ON messages(from_name);
"#;

const MESSAGE_COLS: &str = "id, from_name, to_name, text, kind, time";

/// Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory database. One connection, so every caller sees the same data.
    pub async fn memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        pool.execute(SCHEMA).await?;
        Ok(Self { pool })
    }

    /* ---------------- participants ---------------- */

    pub async fn participant(&self, name: &str) -> Result<Option<Participant>, sqlx::Error> {
        sqlx::query_as("SELECT name, last_status FROM participants WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn participants(&self) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as("SELECT name, last_status FROM participants ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Inserts the participant and its arrival notice together.
    pub async fn register(&self, name: &str, now_ms: i64, time: String) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO participants (name, last_status) VALUES (?, ?)")
            .bind(name)
            .bind(now_ms)
            .execute(&mut *tx)
            .await?;
        insert_message(&mut *tx, &NewMessage::arrival(name, time)).await?;
        tx.commit().await
    }

    /// Returns how many participants were refreshed (0 or 1).
    pub async fn touch(&self, name: &str, now_ms: i64) -> Result<u64, sqlx::Error> {
        let done = sqlx::query("UPDATE participants SET last_status = ? WHERE name = ?")
            .bind(now_ms)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }

    /// Deletes everyone last seen before `cutoff_ms` and posts one departure
    /// notice per deleted row, in a single transaction. Returns the evicted names.
    pub async fn evict_idle(&self, cutoff_ms: i64, time: &str) -> Result<Vec<String>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let gone: Vec<(String,)> =
            sqlx::query_as("DELETE FROM participants WHERE last_status < ? RETURNING name")
                .bind(cutoff_ms)
                .fetch_all(&mut *tx)
                .await?;

        let names: Vec<String> = gone.into_iter().map(|(n,)| n).collect();
        for name in &names {
            insert_message(&mut *tx, &NewMessage::departure(name, time.to_string())).await?;
        }
        tx.commit().await?;
        Ok(names)
    }

    /* ---------------- messages ---------------- */

    pub async fn add_message(&self, msg: &NewMessage) -> Result<Message, sqlx::Error> {
        let id = insert_message(&self.pool, msg).await?;
        Ok(Message {
            id,
            from: msg.from.clone(),
            to: msg.to.clone(),
            text: msg.text.clone(),
            kind: msg.kind,
            time: msg.time.clone(),
        })
    }

    pub async fn message(&self, id: &str) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {MESSAGE_COLS} FROM messages WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Broadcasts, messages to `user` and messages from `user`, newest first.
    pub async fn visible_to(&self, user: &str, limit: Option<i64>) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {MESSAGE_COLS} FROM messages \
             WHERE to_name = ? OR to_name = ? OR from_name = ? \
             ORDER BY seq DESC LIMIT ?"
        ))
        .bind(BROADCAST)
        .bind(user)
        .bind(user)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn edit_message(&self, id: &str, edit: &MessageEdit) -> Result<u64, sqlx::Error> {
        let done = sqlx::query("UPDATE messages SET to_name = ?, text = ?, kind = ? WHERE id = ?")
            .bind(&edit.to)
            .bind(&edit.text)
            .bind(edit.kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }

    pub async fn delete_message(&self, id: &str) -> Result<u64, sqlx::Error> {
        let done = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

async fn insert_message<'e, E>(ex: E, msg: &NewMessage) -> Result<String, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO messages (id, from_name, to_name, text, kind, time) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&msg.from)
    .bind(&msg.to)
    .bind(&msg.text)
    .bind(msg.kind.as_str())
    .bind(&msg.time)
    .execute(ex)
    .await?;
    Ok(id)
}
