#[tokio::main]
async fn main() {
    clinic_backend::run().await;
}
