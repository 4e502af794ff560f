// ============================================================================
// Locale Renderer Interface
// Contract for the external collaborator that turns amounts into locale text
// ============================================================================

use crate::numeric::{AmountError, AmountResult, DecimalValue};
use crate::units::{is_currency_code, is_unit_identifier};
use std::sync::Arc;

/// How the renderer should present the number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStyle {
    /// Bare number
    Decimal,
    /// Currency style for an ISO 4217 code
    Currency(String),
    /// Measurement-unit style for a unit identifier
    Unit(String),
}

impl RenderStyle {
    /// Style for the unit text chosen by the display policy. Three uppercase
    /// letters is a currency; anything else is a measurement unit.
    pub fn for_unit(unit: Option<&str>) -> Self {
        match unit {
            None => RenderStyle::Decimal,
            Some(code) if is_currency_code(code) => RenderStyle::Currency(code.to_string()),
            Some(id) => RenderStyle::Unit(id.to_string()),
        }
    }
}

/// A single rendering call.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub locale: &'a str,
    /// Already rounded; the renderer must not change its digits
    pub value: &'a DecimalValue,
    pub style: &'a RenderStyle,
}

/// Produces locale-aware text for an amount.
///
/// Implementations own numeral shaping, grouping and translated unit names.
/// A pairing they cannot render is an `UnsupportedFormat` error.
pub trait LocaleRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest<'_>) -> AmountResult<String>;

    /// Name used in logs
    fn name(&self) -> &str {
        "renderer"
    }
}

impl<R: LocaleRenderer + ?Sized> LocaleRenderer for Arc<R> {
    fn render(&self, request: &RenderRequest<'_>) -> AmountResult<String> {
        (**self).render(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Locale-neutral renderer: digits as stored, unit identifier or currency
/// code after a space. Rejects malformed locale tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl LocaleRenderer for PlainRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> AmountResult<String> {
        if !is_locale_tag(request.locale) {
            return Err(AmountError::unsupported_format(format!(
                "malformed locale {:?}",
                request.locale
            )));
        }

        match request.style {
            RenderStyle::Decimal => Ok(request.value.to_string()),
            RenderStyle::Currency(code) => Ok(format!("{} {code}", request.value)),
            RenderStyle::Unit(id) if is_unit_identifier(id) => Ok(format!("{} {id}", request.value)),
            RenderStyle::Unit(id) => Err(AmountError::unsupported_format(format!(
                "cannot render unit {id:?} for {}",
                request.locale
            ))),
        }
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// Decorator that logs every request before delegating.
#[derive(Debug, Clone, Default)]
pub struct LoggingRenderer<R> {
    inner: R,
}

impl<R: LocaleRenderer> LoggingRenderer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: LocaleRenderer> LocaleRenderer for LoggingRenderer<R> {
    fn render(&self, request: &RenderRequest<'_>) -> AmountResult<String> {
        tracing::debug!(
            renderer = self.inner.name(),
            locale = request.locale,
            value = %request.value,
            style = ?request.style,
            "rendering amount"
        );
        let rendered = self.inner.render(request);
        if let Err(error) = &rendered {
            tracing::debug!(%error, "render failed");
        }
        rendered
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Language subtag (2-3 or 5-8 letters) followed by 1-8 character
/// alphanumeric subtags, separated by `-` or `_`.
fn is_locale_tag(locale: &str) -> bool {
    let mut subtags = locale.split(['-', '_']);
    let language_ok = subtags.next().is_some_and(|language| {
        matches!(language.len(), 2..=3 | 5..=8)
            && language.bytes().all(|b| b.is_ascii_alphabetic())
    });
    language_ok
        && subtags.all(|tag| {
            (1..=8).contains(&tag.len()) && tag.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}
