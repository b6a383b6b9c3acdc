use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Generates a cryptographically secure random secret suitable for
/// signing session cookies.
///
/// Creates a 64-byte random secret using a cryptographically secure
/// random number generator and encodes it as base64 for easy storage in
/// configuration files. Keep the generated secret confidential.
pub fn handle_generate_secret_command() {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    let encoded = general_purpose::STANDARD.encode(secret);

    println!("🔐 Generated session secret:");
    println!();
    println!("session:");
    println!("  secret: \"{}\"", encoded);
    println!("  expiration_days: 7");
    println!();
    println!("Add this to your config/{{environment}}.yaml file.");
}
