use std::time::Duration;

use battag::{Session, SimulatedSource};

#[tokio::main]
pub async fn main(){
    env_logger::init();

    let mut session = Session::new();
    let mut source = SimulatedSource::new(None).with_delay(Duration::from_secs(2));
    loop {
        let notification = session.read_from(&mut source).await;
        println!("{}", notification.message);
        println!("{}", session.dashboard());
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
