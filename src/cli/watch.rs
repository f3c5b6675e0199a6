use crate::{error::Result, pool::Summary, service};

use super::{
    common::{create_config, create_store},
    WatchArgs,
};

pub async fn main(args: WatchArgs) -> Result<Summary> {
    let store = create_store(&args.global).await?;
    let config = create_config(args.directory, &args.settings);
    service::run_watch(&config, store).await
}
