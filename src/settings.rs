// App-level settings - persisted across sessions
use directories::ProjectDirs;
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// Recently opened video entry
#[derive(Debug, Clone)]
pub struct RecentVideo {
    pub id: i64,
    pub path: PathBuf,
    pub name: String,
    pub duration: f64,
    #[allow(dead_code)]
    pub last_opened: String,
}

/// App-level settings manager
pub struct AppSettings {
    conn: Connection,
}

impl AppSettings {
    /// Open or create the app settings database
    pub fn open() -> Result<Self> {
        let settings_path = Self::settings_path();

        // Create parent directory if needed
        if let Some(parent) = settings_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let conn = Connection::open(&settings_path)?;

        // Enable WAL mode
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let settings = Self { conn };
        settings.initialize_schema()?;

        Ok(settings)
    }

    /// Get the path to the settings database
    fn settings_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "filmstrip", "Filmstrip") {
            proj_dirs.config_dir().join("settings.db")
        } else {
            // Fallback to home directory
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".filmstrip-settings.db")
        }
    }

    /// Initialize database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS recent_videos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                duration REAL NOT NULL DEFAULT 0,
                last_opened TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recent_videos_last_opened
                ON recent_videos(last_opened DESC);
            "#,
        )?;
        Ok(())
    }

    /// Get a setting value
    pub fn get(&self, key: &str) -> Option<String> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_settings WHERE key = ?1")
            .ok()?;

        stmt.query_row(params![key], |row| row.get(0)).ok()
    }

    /// Set a setting value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get the preferred strip height
    pub fn strip_height(&self) -> Option<f32> {
        self.get("strip_height").and_then(|v| v.parse().ok())
    }

    /// Set the preferred strip height
    pub fn set_strip_height(&self, height: f32) -> Result<()> {
        self.set("strip_height", &height.to_string())
    }

    /// Add or refresh a video in the recent list
    pub fn touch_recent(&self, path: &Path, name: &str, duration: f64) -> Result<()> {
        let path_str = path.display().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            r#"
            INSERT INTO recent_videos (path, name, duration, last_opened)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(path) DO UPDATE SET
                name = ?2,
                duration = ?3,
                last_opened = ?4
            "#,
            params![path_str, name, duration, now],
        )?;
        Ok(())
    }

    /// Get recent videos, most recently opened first
    pub fn recent_videos(&self) -> Result<Vec<RecentVideo>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, path, name, duration, last_opened
            FROM recent_videos
            ORDER BY last_opened DESC
            LIMIT 10
            "#,
        )?;

        let entries = stmt.query_map([], |row| {
            let path_str: String = row.get(1)?;

            Ok(RecentVideo {
                id: row.get(0)?,
                path: PathBuf::from(path_str),
                name: row.get(2)?,
                duration: row.get(3)?,
                last_opened: row.get(4)?,
            })
        })?;

        entries.collect()
    }

    /// Remove a video from the recent list
    pub fn remove_recent(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM recent_videos WHERE id = ?1", params![id])?;
        Ok(())
    }
}
