mod home;
mod lottery;
mod my_lotteries;

pub use home::Home;
pub use lottery::LotteryPage;
pub use my_lotteries::MyLotteries;
