pub mod book;
pub mod borrowing;
pub mod reservation;
pub mod stats;
pub mod user;

pub use book::{Book, BookDraft, BookPage, Genre, Pagination};
pub use borrowing::{BorrowStatus, Borrowing, BorrowingHit};
pub use reservation::{Reservation, ReservationStatus};
pub use stats::LibraryStats;
pub use user::{NewUser, Role, User, UserUpdate};
