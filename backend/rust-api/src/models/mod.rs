pub mod achievement;
pub mod answer;
pub mod leaderboard;
pub mod question;
pub mod session;
