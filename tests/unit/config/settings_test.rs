// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试配置加载和默认值

#[cfg(test)]
mod tests {
    use roof_estimator::config::settings::Settings;

    #[test]
    fn test_config_loading_defaults() {
        match Settings::new() {
            Ok(settings) => {
                assert!(!settings.llm.model.is_empty());
                assert!(settings.llm.api_base_url.starts_with("http"));
                assert!(!settings.llm.api_version.is_empty());
                assert!(settings.llm.max_tokens > 0);
                assert!(settings.estimate.max_duration().as_secs() > 0);
                assert!(!settings.metrics.listen_addr.is_empty());
            }
            Err(e) => {
                panic!("Failed to load configuration: {}", e);
            }
        }
    }
}
