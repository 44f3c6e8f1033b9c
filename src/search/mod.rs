//! Search URL state and the chainable builder over it.
//!
//! [`QueryBuilder`] threads a `Result<SearchState, SearchError>` through every
//! operation. A failed step turns the rest of the chain into no-ops, and the
//! first error comes out of [`QueryBuilder::finalize`] unchanged.

mod clause;
mod params;
mod sanitize;
mod time_range;

use std::fmt;

use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;

pub use clause::{merge, BoolOp, Clause};
pub use params::SearchParams;
pub use sanitize::sanitize_input;
pub use time_range::{format_timestamp, parse_timestamp, truncate_to_millis, IntoTimestamp, TimeRange};

use params::{FIELDS, QUERY};

/// Path every search URL points at, whatever the base URL carried.
pub const SEARCH_PATH: &str = "/search";

/// Accumulated target URL: origin, fixed search path and decoded parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    base: Url,
    params: SearchParams,
}

impl SearchState {
    /// Parses `base_url`, keeping scheme, host and port only. Credentials are dropped.
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let mut base =
            Url::parse(base_url.trim()).map_err(|e| SearchError::invalid_url(base_url, e))?;
        if base.cannot_be_a_base() || base.host_str().map_or(true, str::is_empty) {
            return Err(SearchError::invalid_url(base_url, "URL has no host"));
        }
        base.set_username("")
            .and_then(|()| base.set_password(None))
            .map_err(|()| SearchError::invalid_url(base_url, "cannot strip credentials"))?;
        base.set_path(SEARCH_PATH);
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self {
            base,
            params: SearchParams::new(),
        })
    }

    /// Scheme, host, port and `/search`, without any query.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Current boolean expression (`q`), if any clause has been added.
    pub fn query(&self) -> Option<&str> {
        self.params.get(QUERY)
    }

    /// Selected result fields, in the order given to `show_fields`.
    pub fn fields(&self) -> Option<Vec<&str>> {
        self.params.get(FIELDS).map(|f| {
            if f.is_empty() {
                Vec::new()
            } else {
                f.split(',').collect()
            }
        })
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::from_params(&self.params)
    }

    /// Full URL with the canonically encoded query string.
    pub fn to_url(&self) -> Url {
        let mut url = self.base.clone();
        if !self.params.is_empty() {
            url.set_query(Some(&self.params.encode()));
        }
        url
    }

    /// Single mutation path for the parameter mapping.
    fn update(mut self, op: &str, f: impl FnOnce(&mut SearchParams)) -> Self {
        f(&mut self.params);
        tracing::debug!("{}: params now {}", op, self.params.encode());
        self
    }

    fn merge_clause(self, op: BoolOp, clause: Option<Clause>) -> Self {
        let Some(clause) = clause else {
            tracing::trace!("{:?} clause skipped: blank input", op);
            return self;
        };
        let next = merge(self.query(), op, &clause);
        match next {
            Some(q) => self.update("merge clause", |p| p.set(QUERY, q)),
            None => {
                tracing::trace!("{:?} clause {} skipped: no expression to join", op, clause);
                self
            }
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_url().as_str())
    }
}

/// Chainable builder for search URLs.
///
/// Every method consumes the builder and returns the updated one. Methods
/// taking text are no-ops when the text is blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    state: Result<SearchState, SearchError>,
}

impl QueryBuilder {
    /// Starts a chain at `<scheme>://<host>[:port]/search` with no parameters.
    ///
    /// An unparseable URL yields a failed builder (`InvalidUrl`).
    pub fn initialize(base_url: &str) -> Self {
        let state = SearchState::new(base_url);
        if let Err(e) = &state {
            tracing::debug!("search chain failed at initialize: {}", e);
        }
        Self { state }
    }

    /// Starts a chain from a loaded config: base URL, then default fields and
    /// default relative range when configured.
    pub fn from_config(cfg: &SearchConfig) -> Self {
        let mut builder = match cfg.base_url.as_deref() {
            Some(url) => Self::initialize(url),
            None => Self::from(SearchError::invalid_url("", "no base_url configured")),
        };
        if let Some(fields) = &cfg.fields {
            builder = builder.show_fields(fields);
        }
        if let Some(minutes) = cfg.default_minutes {
            builder = builder.minutes_ago(minutes);
        }
        builder
    }

    pub fn for_text(self, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::And, Clause::text(text)))
    }

    pub fn and_for_text(self, text: &str) -> Self {
        self.for_text(text)
    }

    pub fn for_field(self, field: &str, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::And, Clause::field(field, text)))
    }

    pub fn and_for_field(self, field: &str, text: &str) -> Self {
        self.for_field(field, text)
    }

    /// OR-joins `text`. No-op while there is no expression yet.
    pub fn or_for_text(self, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::Or, Clause::text(text)))
    }

    /// OR-joins `field:"text"`. No-op while there is no expression yet.
    pub fn or_for_field(self, field: &str, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::Or, Clause::field(field, text)))
    }

    /// Excludes `text`; starts the expression as `NOT text` when empty.
    pub fn not_for_text(self, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::Not, Clause::text(text)))
    }

    pub fn not_for_field(self, field: &str, text: &str) -> Self {
        self.map(|s| s.merge_clause(BoolOp::Not, Clause::field(field, text)))
    }

    /// Absolute range. Both ends are normalized to UTC with millisecond precision.
    pub fn between(self, from: impl IntoTimestamp, to: impl IntoTimestamp) -> Self {
        self.try_map(|s| {
            let range = TimeRange::absolute(from.into_timestamp()?, to.into_timestamp()?);
            Ok(s.update("between", |p| range.apply(p)))
        })
    }

    pub fn minutes_ago(self, minutes: i64) -> Self {
        self.relative("minutes", minutes, 60)
    }

    pub fn hours_ago(self, hours: i64) -> Self {
        self.relative("hours", hours, 3_600)
    }

    pub fn days_ago(self, days: i64) -> Self {
        self.relative("days", days, 86_400)
    }

    /// Keyword range; the expression is passed to the service verbatim.
    pub fn within(self, expression: &str) -> Self {
        self.map(|s| match sanitize_input(expression) {
            Some(expr) => {
                let range = TimeRange::Keyword(expr.to_string());
                s.update("within", |p| range.apply(p))
            }
            None => {
                tracing::trace!("within skipped: blank expression");
                s
            }
        })
    }

    /// Applies any time range. Relative ranges must be at least one second.
    pub fn time_range(self, range: TimeRange) -> Self {
        self.try_map(|s| {
            let range = match range {
                TimeRange::Relative { seconds: 0 } => {
                    return Err(SearchError::InvalidArgument {
                        name: "seconds",
                        value: 0,
                    })
                }
                TimeRange::Absolute { from, to } => TimeRange::absolute(from, to),
                TimeRange::Keyword(expr) => match sanitize_input(&expr) {
                    Some(e) => TimeRange::Keyword(e.to_string()),
                    None => return Ok(s),
                },
                other => other,
            };
            Ok(s.update("time range", |p| range.apply(p)))
        })
    }

    /// Sets `fields` to the comma-joined names; an empty list still sets it.
    pub fn show_fields<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.map(|s| s.update("show fields", |p| p.set(FIELDS, joined)))
    }

    /// Current state, or the error that stopped the chain.
    pub fn state(&self) -> Result<&SearchState, &SearchError> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Result<SearchState, SearchError> {
        self.state
    }

    /// Serializes the chain to a URL string.
    pub fn finalize(self) -> Result<String, SearchError> {
        self.state.map(|s| String::from(s.to_url()))
    }

    fn relative(self, name: &'static str, amount: i64, unit_secs: u64) -> Self {
        self.try_map(|s| {
            let seconds = u64::try_from(amount)
                .ok()
                .filter(|n| *n > 0)
                .and_then(|n| n.checked_mul(unit_secs))
                .ok_or(SearchError::InvalidArgument {
                    name,
                    value: amount,
                })?;
            let range = TimeRange::Relative { seconds };
            Ok(s.update(name, |p| range.apply(p)))
        })
    }

    fn map(self, f: impl FnOnce(SearchState) -> SearchState) -> Self {
        Self {
            state: self.state.map(f),
        }
    }

    fn try_map(self, f: impl FnOnce(SearchState) -> Result<SearchState, SearchError>) -> Self {
        match self.state {
            Ok(s) => {
                let state = f(s);
                if let Err(e) = &state {
                    tracing::debug!("search chain failed: {}", e);
                }
                Self { state }
            }
            Err(e) => Self { state: Err(e) },
        }
    }
}

impl From<SearchError> for QueryBuilder {
    fn from(err: SearchError) -> Self {
        Self { state: Err(err) }
    }
}

impl From<SearchState> for QueryBuilder {
    fn from(state: SearchState) -> Self {
        Self { state: Ok(state) }
    }
}

/// Decodes the query string of a search URL into its parameter mapping.
pub fn decode_search_url(url: &str) -> Result<SearchParams, SearchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| SearchError::invalid_url(url, e))?;
    Ok(parsed.query_pairs().into_owned().collect())
}
