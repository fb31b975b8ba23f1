// Demo binary: resolve an identifier and print the unified selection as JSON

use stream_resolver::{StreamResolver, UnifiedRequest};

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let identifier = match args.next() {
        Some(id) => id,
        None => {
            eprintln!("usage: stream-resolver <id-or-url> [quality] [audio-kbps]");
            std::process::exit(2);
        }
    };
    let quality = args.next().unwrap_or_else(|| "1080p".to_string());
    let audio_kbps = args.next().and_then(|s| s.parse().ok()).unwrap_or(192);

    let request = UnifiedRequest::new(identifier)
        .with_video_quality(quality)
        .with_audio_bitrate(audio_kbps);

    let resolver = StreamResolver::new();
    match resolver.unified_streams(&request).await {
        Ok(unified) => match serde_json::to_string_pretty(&unified) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to encode result: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(if e.is_upstream() { 1 } else { 2 });
        }
    }
}
