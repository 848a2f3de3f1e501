use bugfixer::ServerConfig;
use clap::Parser;

// Kept as the only test in this binary: it mutates process environment.
#[test]
fn test_port_comes_from_environment_with_8080_default() {
    std::env::remove_var("PORT");
    let config = ServerConfig::try_parse_from(["bugfixer"]).unwrap();
    assert_eq!(config.port(), 8080);

    std::env::set_var("PORT", "5000");
    let config = ServerConfig::try_parse_from(["bugfixer"]).unwrap();
    assert_eq!(config.port(), 5000);

    // Flags still win over the environment.
    let config = ServerConfig::try_parse_from(["bugfixer", "--port", "7000"]).unwrap();
    assert_eq!(config.port(), 7000);

    std::env::remove_var("PORT");
}
