use dioxus::prelude::*;

use crate::pages::{Home, LotteryPage, MyLotteries};
use crate::components::Layout;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/lottery/:id")]
    LotteryPage { id: String },
    #[route("/my-lotteries")]
    MyLotteries {},
}
