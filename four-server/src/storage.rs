//! 战绩存储
//!
//! 每局终局追加写入一个 JSON 文件，记录一经写入不再修改。
//! 读取路径（榜单查询的数据来源）按时间倒序返回全部记录。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use protocol::MatchRecord;

/// 战绩存储
pub struct RecordStore {
    records_dir: PathBuf,
}

impl RecordStore {
    /// 创建存储，使用跨平台应用数据目录
    pub fn new() -> Result<Self> {
        Self::with_directory(get_records_directory()?)
    }

    /// 在指定目录创建存储，目录不存在时建立
    pub fn with_directory(records_dir: PathBuf) -> Result<Self> {
        if !records_dir.exists() {
            fs::create_dir_all(&records_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", records_dir))?;
        }

        Ok(Self { records_dir })
    }

    /// 写入一条终局记录。每个终结的对局恰好调用一次，失败由调用方记日志，不重试。
    pub fn create_record(
        &self,
        player1: &str,
        player2: &str,
        winner: &str,
    ) -> Result<MatchRecord> {
        let record = MatchRecord::new(
            player1.to_string(),
            player2.to_string(),
            winner.to_string(),
        );

        let filename = generate_filename(&record.created_at, player1, player2);
        let filepath = self.records_dir.join(&filename);

        let json_content = record.to_json().context("序列化战绩失败")?;
        fs::write(&filepath, json_content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        Ok(record)
    }

    /// 读取全部记录，按写入时间倒序（最新在前）
    pub fn list_records(&self) -> Result<Vec<MatchRecord>> {
        let mut records = Vec::new();

        if !self.records_dir.exists() {
            return Ok(records);
        }

        let entries = fs::read_dir(&self.records_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", self.records_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(_) => continue,
            };
            match MatchRecord::from_json(&content) {
                Ok(record) => records.push(record),
                Err(_) => {
                    // 跳过损坏的文件
                    continue;
                }
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// 存储目录路径
    pub fn records_directory(&self) -> &Path {
        &self.records_dir
    }
}

/// 获取跨平台存储目录
fn get_records_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;
    Ok(app_data_dir.join("connect-four").join("records"))
}

/// 生成文件名：时间戳 + 双方名称 + 随机后缀（同秒终局的对局不互相覆盖）
fn generate_filename(timestamp: &DateTime<Utc>, player1: &str, player2: &str) -> String {
    let timestamp_str = timestamp.format("%Y%m%d_%H%M%S").to_string();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();

    format!(
        "{}_{}vs{}_{}.json",
        timestamp_str,
        sanitize_filename(player1),
        sanitize_filename(player2),
        suffix
    )
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
