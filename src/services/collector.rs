use crate::config::{AppConfig, CollectorConfig, SourceConfig};
use crate::error::{AppError, AppResult};
use crate::html;
use crate::models::{EventGroup, RankEntry, SnapshotDate};
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TITLE_MARKER: &str = r#"class="custom-table-title""#;
const LIST_MARKER: &str = r#"class="performance-list""#;
const ROW_MARKER: &str = r#"class="performance-list-row"#;
const ATHLETE_CELL: &str = r#"data-label="Athlete""#;
const TIME_CELL: &str = r#"data-label="Time""#;
const MISSING: &str = "N/A";

/// One performance row as it appears on the list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedRow {
    pub event: String,
    pub athlete: String,
    pub time: String,
}

/// What a collect run produced
#[derive(Debug, Clone)]
pub struct CollectReport {
    pub date: SnapshotDate,
    pub events: usize,
    pub entries: usize,
    pub snapshot_path: PathBuf,
    pub manifest_updated: bool,
}

/// Extract every performance row from the qualifying list HTML.
///
/// Each event starts at a `custom-table-title` block holding an `<h3>`;
/// its rows are the `performance-list-row` blocks up to the next title.
pub fn scrape_rows(page: &str) -> Vec<ScrapedRow> {
    let titles = html::find_all(page, TITLE_MARKER);
    let mut rows = Vec::new();

    for (i, &start) in titles.iter().enumerate() {
        let end = titles.get(i + 1).copied().unwrap_or(page.len());
        let section = &page[start..end];

        let event = match html::first_element_inner(section, "h3") {
            Some(inner) => html::text_lines(inner),
            None => continue,
        };

        // results live in the list that follows the title
        let list = match section.find(LIST_MARKER) {
            Some(at) => &section[at..],
            None => continue,
        };

        let row_starts = html::find_all(list, ROW_MARKER);
        for (j, &row_start) in row_starts.iter().enumerate() {
            let row_end = row_starts.get(j + 1).copied().unwrap_or(list.len());
            let row = &list[row_start..row_end];

            let cell = |attr: &str| {
                html::div_inner_with_attr(row, attr)
                    .map(html::text)
                    .unwrap_or_else(|| MISSING.to_string())
            };

            rows.push(ScrapedRow {
                event: event.clone(),
                athlete: cell(ATHLETE_CELL),
                time: cell(TIME_CELL),
            });
        }
    }

    rows
}

/// Group rows by event (sorted by label) keeping the first `top_n`, ranked 1..
pub fn group_rankings(rows: Vec<ScrapedRow>, top_n: usize) -> Vec<EventGroup> {
    let mut by_event: BTreeMap<String, Vec<RankEntry>> = BTreeMap::new();

    for row in rows {
        let rankings = by_event.entry(row.event).or_default();
        if rankings.len() < top_n {
            rankings.push(RankEntry {
                rank: rankings.len() as u32 + 1,
                athlete: Some(row.athlete),
                time: row.time,
            });
        }
    }

    by_event
        .into_iter()
        .map(|(event, rankings)| EventGroup { event, rankings })
        .collect()
}

fn to_json_4<T: Serialize + ?Sized>(value: &T) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Write one snapshot file
pub fn write_snapshot(path: &Path, groups: &[EventGroup]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json_4(groups)?)?;
    Ok(())
}

/// Add `date` to the manifest if absent, keeping it sorted.
///
/// Returns whether the manifest changed. An unreadable manifest is rebuilt.
pub fn update_manifest(path: &Path, date: SnapshotDate) -> AppResult<bool> {
    let mut dates: Vec<String> = match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Manifest {:?} is not a JSON list ({}), starting fresh", path, e);
            Vec::new()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let today = date.to_string();
    if dates.contains(&today) {
        info!("Manifest up to date: {} already listed", today);
        return Ok(false);
    }

    dates.push(today.clone());
    dates.sort();
    dates.dedup();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json_4(&dates)?)?;
    info!("Updated manifest: {} added to {:?}", today, path);
    Ok(true)
}

/// Scrapes the qualifying list into a dated snapshot plus manifest entry
pub struct Collector {
    client: Client,
    config: CollectorConfig,
    source: SourceConfig,
    data_dir: PathBuf,
}

impl Collector {
    /// Create a new Collector writing into the configured data directory
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.source.fetch_timeout())
            .build()?;

        Ok(Self {
            client,
            config: config.collector.clone(),
            source: config.source.clone(),
            data_dir: config.data_dir(),
        })
    }

    /// Set the output directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the list URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Download the list page
    pub async fn fetch_page(&self) -> AppResult<String> {
        info!("Fetching qualifying list {}", self.config.url);

        let response = self
            .client
            .get(&self.config.url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(REFERER, "https://www.tfrrs.org/")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Collect(format!("HTTP {} from {}", status, self.config.url)));
        }

        Ok(response.text().await?)
    }

    /// Fetch today's list and store it
    pub async fn collect(&self) -> AppResult<CollectReport> {
        let page = self.fetch_page().await?;
        self.store(SnapshotDate::today(), &page)
    }

    /// Scrape `page` and write it as the snapshot for `date`
    pub fn store(&self, date: SnapshotDate, page: &str) -> AppResult<CollectReport> {
        let groups = group_rankings(scrape_rows(page), self.config.top_n);
        if groups.is_empty() {
            return Err(AppError::Collect("no event tables found on the list page".to_string()));
        }

        let snapshot_path = self
            .data_dir
            .join(self.source.snapshot_file_name(&date.to_string()));
        write_snapshot(&snapshot_path, &groups)?;

        let entries = groups.iter().map(|g| g.rankings.len()).sum();
        info!(
            "Wrote {} events ({} entries) to {:?}",
            groups.len(),
            entries,
            snapshot_path
        );

        let manifest_updated = update_manifest(&self.data_dir.join(&self.source.index_file), date)?;

        Ok(CollectReport {
            date,
            events: groups.len(),
            entries,
            snapshot_path,
            manifest_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, time: &str) -> String {
        format!(
            r#"<div class="performance-list-row"><div data-label="Place">1</div><div data-label="Athlete"><a href="/a">{}</a></div><div data-label="Time">{}</div></div>"#,
            name, time
        )
    }

    fn page() -> String {
        format!(
            r#"<html><body>
            <div class="custom-table-title"><h3>Mile
                Men</h3></div>
            <div class="performance-list">{}{}{}</div>
            <div class="custom-table-title"><h3>60 Meters Women</h3></div>
            <div class="performance-list">{}<div class="performance-list-row"><div data-label="Athlete">Lone, Runner</div></div></div>
            </body></html>"#,
            row("Doe, John", "3:55.10"),
            row("Roe, Rick", "#3:56.00"),
            row("Poe, Pat", "3:57.25"),
            row("Smith, Sue", "7.10"),
        )
    }

    #[test]
    fn test_scrape_rows() {
        let rows = scrape_rows(&page());
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0],
            ScrapedRow {
                event: "Mile\nMen".to_string(),
                athlete: "Doe, John".to_string(),
                time: "3:55.10".to_string(),
            }
        );
        assert_eq!(rows[1].time, "#3:56.00");
        assert_eq!(rows[3].event, "60 Meters Women");
        assert_eq!(rows[4].time, "N/A");
    }

    #[test]
    fn test_group_rankings_sorted_and_truncated() {
        let groups = group_rankings(scrape_rows(&page()), 2);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].event, "60 Meters Women");
        assert_eq!(groups[1].event, "Mile\nMen");
        assert_eq!(groups[1].rankings.len(), 2);
        assert_eq!(groups[1].rankings[1].rank, 2);
        assert_eq!(groups[1].rankings[1].athlete.as_deref(), Some("Roe, Rick"));
    }

    #[test]
    fn test_update_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.json");
        let d = |s: &str| SnapshotDate::parse(s).unwrap();

        assert!(update_manifest(&path, d("2024-01-03")).unwrap());
        assert!(update_manifest(&path, d("2024-01-01")).unwrap());
        assert!(!update_manifest(&path, d("2024-01-03")).unwrap());

        let dates: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn test_update_manifest_rebuilds_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(update_manifest(&path, SnapshotDate::parse("2024-02-02").unwrap()).unwrap());
        let dates: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(dates, vec!["2024-02-02"]);
    }

    #[test]
    fn test_store_writes_snapshot_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(&AppConfig::default())
            .unwrap()
            .with_data_dir(dir.path());
        let date = SnapshotDate::parse("2024-01-01").unwrap();

        let report = collector.store(date, &page()).unwrap();
        assert_eq!(report.events, 2);
        assert_eq!(report.entries, 5);
        assert!(report.manifest_updated);
        assert_eq!(
            report.snapshot_path,
            dir.path().join("tfrrs_data (2024-01-01).json")
        );

        let written = std::fs::read_to_string(&report.snapshot_path).unwrap();
        assert!(written.starts_with("[\n    {"));
        let groups: Vec<EventGroup> = serde_json::from_str(&written).unwrap();
        assert_eq!(groups[1].rankings[0].time, "3:55.10");
    }

    #[test]
    fn test_store_rejects_page_without_events() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(&AppConfig::default())
            .unwrap()
            .with_data_dir(dir.path());
        let result = collector.store(SnapshotDate::parse("2024-01-01").unwrap(), "<html></html>");
        assert!(matches!(result, Err(AppError::Collect(_))));
        assert!(!dir.path().join("dates.json").exists());
    }
}
