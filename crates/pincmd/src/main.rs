use pincmd::MappingProfile;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let profile = args.next().unwrap_or_else(|| "relay".to_string());
    let input = args.next().unwrap_or_else(|| "-".to_string());

    let profile = match profile.as_str() {
        "direct" => MappingProfile::Direct,
        "relay" | "relay-board" | "board" => MappingProfile::RelayBoard,
        other => {
            eprintln!("Unknown profile '{}'. Supported: direct, relay", other);
            eprintln!("Usage: pincmd [direct|relay] [input-path|-]");
            std::process::exit(2);
        }
    };

    if let Err(err) = pincmd::run(profile, &input) {
        eprintln!("pincmd: {err:#}");
        std::process::exit(1);
    }
}
