//! Exchange rate and counter-amount computation for a two-asset swap.
use crate::core::error::ValidationError;
use crate::core::price::AssetPrice;
use tracing::debug;

/// Decimal places kept on a computed output amount.
pub const OUTPUT_DECIMALS: i32 = 4;

/// A swap to be quoted: raw user text for the amount plus the selected pair.
#[derive(Debug, Clone, Copy)]
pub struct SwapRequest<'a> {
    pub input_amount: &'a str,
    pub source: &'a AssetPrice,
    pub target: &'a AssetPrice,
    pub balance_ceiling: f64,
}

/// Outcome of quoting a [`SwapRequest`].
///
/// Both fields are `None` for empty input. An over-balance amount carries
/// both an output and an `InsufficientBalance` error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapResult {
    pub output_amount: Option<f64>,
    pub error: Option<ValidationError>,
}

impl SwapResult {
    fn failed(error: ValidationError) -> Self {
        Self {
            output_amount: None,
            error: Some(error),
        }
    }
}

/// Rounds half away from zero to `decimals` places.
///
/// Values too large to scale have no fractional digits left and are returned
/// as is.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn rate_between(source: &AssetPrice, target: &AssetPrice) -> Result<f64, ValidationError> {
    let rate = source.price / target.price;
    if target.price == 0.0 || !rate.is_finite() {
        return Err(ValidationError::InvalidRate {
            from: source.symbol.clone(),
            to: target.symbol.clone(),
        });
    }
    Ok(rate)
}

/// Units of `target` received for one unit of `source`.
///
/// Returns `0` while either side is still unselected.
pub fn exchange_rate(
    source: Option<&AssetPrice>,
    target: Option<&AssetPrice>,
) -> Result<f64, ValidationError> {
    match (source, target) {
        (Some(source), Some(target)) => rate_between(source, target),
        _ => Ok(0.0),
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates the entered amount and computes the counter-amount.
pub fn compute_swap(request: &SwapRequest) -> SwapResult {
    if request.input_amount.is_empty() {
        return SwapResult::default();
    }

    let Some(value) = parse_amount(request.input_amount) else {
        return SwapResult::failed(ValidationError::InvalidAmount);
    };

    let error = if value > request.balance_ceiling {
        Some(ValidationError::InsufficientBalance {
            amount: value,
            balance: request.balance_ceiling,
        })
    } else if value < 0.0 {
        return SwapResult::failed(ValidationError::NonPositiveAmount);
    } else {
        None
    };

    let rate = match rate_between(request.source, request.target) {
        Ok(rate) => rate,
        Err(e) => return SwapResult::failed(e),
    };

    let output = round_to(value * rate, OUTPUT_DECIMALS);
    if !output.is_finite() {
        debug!("Quote for {value} {} overflows", request.source.symbol);
        return SwapResult::failed(ValidationError::InvalidAmount);
    }
    debug!(
        "Quoted {value} {} -> {output} {} at rate {rate}",
        request.source.symbol, request.target.symbol
    );

    SwapResult {
        output_amount: Some(output),
        error,
    }
}
