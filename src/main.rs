use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris::access::{self, View};
use libris::api::ApiClient;
use libris::config::Config;
use libris::models::Role;
use libris::notify::{Kind, NotificationBus};
use libris::services::circulation::CirculationDesk;
use libris::services::search::SearchSelect;
use libris::services::{catalog::CatalogBrowser, dashboard, reservations::ReservationQueue};
use libris::session::{AuthSession, SessionEvent};
use libris::utils::status::{classify, due_label};

fn usage() -> ! {
    eprintln!(
        "usage: libris <command>\n\
         \n\
         \x20 login <username> <password>   Sign in and store the token\n\
         \x20 logout                        Drop the stored token\n\
         \x20 profile                       Show the signed-in user\n\
         \x20 dashboard                     Recent activity and stats\n\
         \x20 books [query] [--genre G] [--page N]\n\
         \x20 book <id>                     Show one book\n\
         \x20 borrow <book-id>              Borrow a book\n\
         \x20 return <borrowing-id>         Return one of your books\n\
         \x20 loans                         Your borrowings\n\
         \x20 reserve <book-id>             Place a hold\n\
         \x20 reservations                  Your holds\n\
         \x20 issue <user> <book>           Admin: issue via the desk\n\
         \x20 return-desk <query>           Admin: return via the desk\n\
         \x20 renew <query>                 Admin: renew via the desk\n\
         \x20 borrowings                    Admin: recent loans\n\
         \x20 fulfill <reservation-id>      Admin: fulfill a hold\n\
         \x20 stats                         Admin: library stats"
    );
    std::process::exit(2);
}

/// Print everything the services put on the bus, the CLI's stand-in for
/// toast rendering.
fn drain_notifications(bus: &NotificationBus) {
    for n in bus.active() {
        let tag = match n.kind {
            Kind::Success => "ok",
            Kind::Error => "error",
            Kind::Warning => "warn",
            Kind::Info => "info",
        };
        eprintln!("[{}] {}", tag, n.message);
    }
}

/// Resolve a typeahead query to its first hit, the CLI's stand-in for a
/// click on the dropdown.
async fn pick_first<T: Clone + Send + Sync + 'static>(
    widget: &SearchSelect<T>,
    query: &str,
) -> bool {
    let before = widget.state().generation;
    widget.input(query);
    let state = widget.wait_until(|s| s.generation > before).await;
    match state.results.first() {
        Some(item) => {
            widget.select(item.clone());
            widget.wait_until(|s| s.selected.is_some()).await;
            true
        }
        None => false,
    }
}

fn require_role(session: &AuthSession, view: View) -> Role {
    let Some(user) = session.current_user() else {
        eprintln!("Not signed in. Run `libris login <username> <password>` first.");
        std::process::exit(1);
    };
    if !access::can_access(user.role, view) {
        eprintln!("Your role ({}) does not have access to this screen.", user.role);
        std::process::exit(1);
    }
    user.role
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libris=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let session = AuthSession::new(config.token_file.clone());
    let bus = NotificationBus::new();
    let api = match ApiClient::new(&config.api_url, config.request_timeout, session.clone()) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Fetch the profile up front so role gates work; a stale token trips
    // the global 401 path here and is evicted.
    if session.is_authenticated() {
        let _ = api.profile().await;
    }

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("");

    let ok = match command {
        "login" => {
            let (Some(username), Some(password)) = (args.get(2), args.get(3)) else {
                usage();
            };
            match api.login(username, password).await {
                Ok(user) => {
                    bus.success("Login successful!");
                    println!("Signed in as {} ({})", user.display_name(), user.role);
                    true
                }
                Err(e) => {
                    bus.error(e.message_or("Invalid username or password"));
                    false
                }
            }
        }
        "logout" => {
            api.logout();
            println!("Signed out.");
            true
        }
        "profile" => match api.profile().await {
            Ok(user) => {
                println!(
                    "{} <{}> - {} (id {})",
                    user.display_name(),
                    user.email,
                    user.role,
                    user.id
                );
                true
            }
            Err(e) => {
                bus.error(e.to_string());
                false
            }
        },
        "dashboard" => {
            let role = require_role(&session, View::Dashboard);
            let now = Utc::now();
            match dashboard::load(&api, role, now).await {
                Ok(data) => {
                    println!("Recent activity:");
                    for b in &data.recent_borrowings {
                        println!(
                            "  {} - {} [{}]",
                            b.title,
                            due_label(b.due_date, now),
                            classify(b, now).label()
                        );
                    }
                    if !data.overdue.is_empty() {
                        println!("Overdue books: {}", data.overdue.len());
                    }
                    if let Some(stats) = data.stats {
                        println!(
                            "Library: {} books, {} available, {} active loans, {} overdue",
                            stats.total_books,
                            stats.available_copies,
                            stats.active_borrowings,
                            stats.overdue_books
                        );
                    }
                    true
                }
                Err(e) => {
                    tracing::debug!("dashboard load failed: {}", e);
                    bus.error("Error fetching dashboard data");
                    false
                }
            }
        }
        "books" => {
            let mut browser = CatalogBrowser::new(api.clone(), bus.clone());
            if let Some(query) = args.get(2).filter(|a| !a.starts_with("--")) {
                browser.search = query.to_string();
            }
            if let Some(pos) = args.iter().position(|a| a == "--genre") {
                browser.genre = args.get(pos + 1).cloned();
            }
            if let Some(pos) = args.iter().position(|a| a == "--page") {
                if let Some(page) = args.get(pos + 1).and_then(|p| p.parse().ok()) {
                    browser.page = page;
                }
            }
            browser.refresh().await;
            for book in &browser.books {
                let availability = if book.is_available() {
                    "Available"
                } else {
                    "Unavailable"
                };
                println!(
                    "#{} {} - {} ({} of {} available) [{}]",
                    book.id,
                    book.title,
                    book.author,
                    book.available_copies,
                    book.total_copies,
                    availability
                );
            }
            println!(
                "Page {} of {} ({} books)",
                browser.page, browser.total_pages, browser.total
            );
            true
        }
        "book" => {
            let Some(id) = args.get(2).and_then(|v| v.parse().ok()) else {
                usage();
            };
            match api.get_book(id).await {
                Ok(book) => {
                    println!("{} - {}", book.title, book.author);
                    println!("ISBN: {}", book.isbn);
                    if let Some(genre) = &book.genre {
                        println!("Genre: {}", genre);
                    }
                    if let Some(description) = &book.description {
                        println!("{}", description);
                    }
                    println!(
                        "{} of {} copies available",
                        book.available_copies, book.total_copies
                    );
                    true
                }
                Err(e) => {
                    tracing::debug!("book fetch failed: {}", e);
                    bus.error("Book not found");
                    false
                }
            }
        }
        "borrow" => {
            let Some(id) = args.get(2).and_then(|v| v.parse().ok()) else {
                usage();
            };
            match api.borrow_book(id).await {
                Ok(()) => {
                    bus.success("Book borrowed successfully! Please return it within 14 days.");
                    true
                }
                Err(e) => {
                    bus.error(e.message_or("Failed to borrow book"));
                    false
                }
            }
        }
        "return" => {
            let Some(id) = args.get(2).and_then(|v| v.parse().ok()) else {
                usage();
            };
            match api.return_book(id).await {
                Ok(()) => {
                    bus.success("Book returned successfully!");
                    true
                }
                Err(e) => {
                    bus.error(e.message_or("Failed to return book"));
                    false
                }
            }
        }
        "loans" => match api.my_borrowings().await {
            Ok(borrowings) => {
                let now = Utc::now();
                for b in &borrowings {
                    println!(
                        "#{} {} - {} [{}]",
                        b.id,
                        b.title,
                        due_label(b.due_date, now),
                        classify(b, now).label()
                    );
                }
                true
            }
            Err(e) => {
                tracing::debug!("borrowings fetch failed: {}", e);
                bus.error("Error fetching your borrowings");
                false
            }
        },
        "reserve" => {
            let Some(id) = args.get(2).and_then(|v| v.parse().ok()) else {
                usage();
            };
            match api.reserve_book(id).await {
                Ok(()) => {
                    bus.success("Book reserved successfully!");
                    true
                }
                Err(e) => {
                    bus.error(e.message_or("Failed to reserve book"));
                    false
                }
            }
        }
        "reservations" => match api.my_reservations().await {
            Ok(reservations) => {
                for r in &reservations {
                    println!(
                        "#{} {} - {} ({})",
                        r.id,
                        r.book_title,
                        r.status.display(),
                        r.reserved_at.format("%Y-%m-%d")
                    );
                }
                true
            }
            Err(e) => {
                bus.error(e.message_or("Failed to fetch reservations"));
                false
            }
        },
        "issue" => {
            require_role(&session, View::AdminPanel);
            let (Some(user_query), Some(book_query)) = (args.get(2), args.get(3)) else {
                usage();
            };
            let desk = CirculationDesk::new(
                api.clone(),
                bus.clone(),
                config.debounce,
                config.typeahead_limit,
            );
            if !pick_first(&desk.users, user_query).await {
                eprintln!("No member matched '{}'", user_query);
            }
            if !pick_first(&desk.books, book_query).await {
                eprintln!("No book matched '{}'", book_query);
            }
            desk.issue().await
        }
        "return-desk" | "renew" => {
            require_role(&session, View::AdminPanel);
            let Some(query) = args.get(2) else {
                usage();
            };
            let desk = CirculationDesk::new(
                api.clone(),
                bus.clone(),
                config.debounce,
                config.typeahead_limit,
            );
            if !pick_first(&desk.borrowings, query).await {
                eprintln!("No active borrowing matched '{}'", query);
            }
            if command == "renew" {
                desk.renew_selected().await
            } else {
                desk.return_selected().await
            }
        }
        "borrowings" => {
            require_role(&session, View::AdminPanel);
            match api.all_borrowings(Some(10)).await {
                Ok(borrowings) => {
                    let now = Utc::now();
                    for b in &borrowings {
                        println!(
                            "#{} {} - {} - {} [{}]",
                            b.id,
                            b.title,
                            b.username.as_deref().unwrap_or("unknown"),
                            due_label(b.due_date, now),
                            classify(b, now).label()
                        );
                    }
                    true
                }
                Err(e) => {
                    bus.error(e.message_or("Failed to fetch borrowings"));
                    false
                }
            }
        }
        "fulfill" => {
            require_role(&session, View::AdminPanel);
            let Some(id) = args.get(2).and_then(|v| v.parse().ok()) else {
                usage();
            };
            let mut queue = ReservationQueue::new(api.clone(), bus.clone());
            queue.fulfill(id).await
        }
        "stats" => {
            require_role(&session, View::AdminPanel);
            match api.stats().await {
                Ok(stats) => {
                    println!("Total books:   {}", stats.total_books);
                    println!("Available:     {}", stats.available_copies);
                    println!("Active loans:  {}", stats.active_borrowings);
                    println!("Overdue:       {}", stats.overdue_books);
                    true
                }
                Err(e) => {
                    bus.error(e.to_string());
                    false
                }
            }
        }
        _ => usage(),
    };

    drain_notifications(&bus);

    // The CLI's analog of the forced redirect: if any request tripped the
    // global 401 path, say so once.
    if matches!(
        *session.watch().borrow(),
        SessionEvent::SignedOut { expired: true }
    ) {
        eprintln!("Session expired. Please log in again with `libris login`.");
    }

    if !ok {
        std::process::exit(1);
    }
}
