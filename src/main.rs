#[actix_web::main]
async fn main() {
    if let Err(err) = sheetstats_lib::run().await {
        eprintln!("sheetstats: {err}");
        std::process::exit(1);
    }
}
