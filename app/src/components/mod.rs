mod buy_ticket_button;
mod create_lottery_modal;
mod launch_lottery_button;
mod layout;
mod lottery_card;
mod lottery_filter;
mod search_box;
mod toast;
mod wallet_button;

pub use buy_ticket_button::BuyTicketButton;
pub use create_lottery_modal::CreateLotteryModal;
pub use launch_lottery_button::LaunchLotteryButton;
pub use layout::Layout;
pub use lottery_card::{LotteryCard, LotteryGrid, StatusBadge};
pub use lottery_filter::LotteryFilter;
pub use search_box::SearchBox;
pub use toast::ToastViewport;
pub use wallet_button::WalletButton;
pub use wallet_button::send_transaction;
