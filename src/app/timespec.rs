use crate::error::ShellError;
use std::time::Duration;

/// Parse a `[hh:][mm:]ss` literal. Components are read right to left as
/// seconds, minutes and hours.
pub fn parse_time_spec(spec: &str) -> Result<Duration, ShellError> {
    let invalid = || ShellError::InvalidTimeSpec(spec.to_string());

    let parts: Vec<&str> = spec.trim().split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let mut seconds: u64 = 0;
    let mut unit: u64 = 1;
    for part in parts.iter().rev() {
        let value: u64 = part.trim().parse().map_err(|_| invalid())?;
        seconds = value
            .checked_mul(unit)
            .and_then(|v| seconds.checked_add(v))
            .ok_or_else(invalid)?;
        unit *= 60;
    }

    Ok(Duration::from_secs(seconds))
}

/// Parse a volume as a `0.0..=1.0` fraction or an `NN%` percentage
pub fn parse_volume(input: &str) -> Result<f32, ShellError> {
    let invalid = || ShellError::InvalidVolume(input.to_string());
    let trimmed = input.trim();

    let fraction = match trimmed.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().map_err(|_| invalid())? / 100.0,
        None => trimmed.parse::<f32>().map_err(|_| invalid())?,
    };

    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(invalid())
    }
}
