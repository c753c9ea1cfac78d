use crate::{
    client::RankingSource,
    config::Settings,
    core::ranking::Item,
    error::{FreshError, FreshResult},
};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::{fmt, time::Duration};
use tracing::debug;

static SELECTOR_ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#Top-Box-Office tr").expect("valid rows selector"));
static SELECTOR_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".middle_col a").expect("valid name selector"));
static SELECTOR_SCORE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".left_col .tMeterScore").expect("valid score selector"));

enum Endpoint {
    Home,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Home => write!(f, "/"),
        }
    }
}

pub struct RottenTomatoes {
    http_client: Client,
    base_url: String,
}

impl RottenTomatoes {
    pub fn new(base_url: &str, timeout: Duration) -> FreshResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> FreshResult<Self> {
        RottenTomatoes::new(&settings.source_base_url, settings.source_timeout())
    }

    pub async fn top_box_office(&self) -> FreshResult<Vec<Item>> {
        let home = self.get(&Endpoint::Home).await?;
        let items = RottenTomatoes::parse_top_box_office(&home);
        debug!("Scraped {} top box office rows", items.len());
        Ok(items)
    }

    async fn get(&self, endpoint: &Endpoint) -> FreshResult<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http_client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            status => Err(FreshError::Http(format!("{status} from {url}"))),
        }
    }

    fn parse_top_box_office(page: &str) -> Vec<Item> {
        // The home page carries a table of the form:
        //
        //      <table id="Top-Box-Office">
        //        <tr>
        //          <td class="left_col"><span class="tMeterScore">87%</span></td>
        //          <td class="middle_col"><a href="/m/...">Title</a></td>
        //          <td class="right_col">$12.3M</td>
        //        </tr>
        //      </table>
        //
        // Every row yields an item, even when a cell is missing.
        let document = Html::parse_document(page);
        document
            .select(&SELECTOR_ROWS)
            .map(|row| Item {
                name: text_of(row, &SELECTOR_NAME).trim().to_string(),
                score: score_to_int(&text_of(row, &SELECTOR_SCORE)),
            })
            .collect()
    }
}

impl RankingSource for RottenTomatoes {
    async fn fetch_ranking(&self) -> FreshResult<Vec<Item>> {
        self.top_box_office().await
    }
}

/// Concatenated text of every element under `row` matching `selector`.
fn text_of(row: ElementRef, selector: &Selector) -> String {
    row.select(selector).flat_map(|el| el.text()).collect()
}

/// "87%" => 87. Anything that is not an integer once the percent signs are
/// removed counts as 0.
fn score_to_int(score: &str) -> i64 {
    score.replace('%', "").trim().parse().unwrap_or_default()
}
