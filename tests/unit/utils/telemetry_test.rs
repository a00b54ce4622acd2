// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use roof_estimator::utils::telemetry;

    #[test]
    fn test_cli_telemetry_initialization_is_repeatable() {
        telemetry::init_cli_telemetry(true);
        telemetry::init_cli_telemetry(false);

        tracing::debug!("This is a debug message");
        tracing::info!(pdf_len = 1024, "Estimate requested");
        tracing::warn!(finding = "pitch percents sum to 90.00, not 100", "Estimate audit discrepancy");
    }

    #[test]
    fn test_default_filter_targets_crate() {
        assert!(telemetry::DEFAULT_LOG_FILTER.contains("roof_estimator=debug"));
    }
}
