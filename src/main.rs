#[actix_web::main]
async fn main() -> std::io::Result<()> {
    nybar_packet_server::run().await
}
