use clap::Parser;
use unilodge_client::{ListingInput, LodgeClient};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "unilodge", about = "Browse and manage UniLodge listings")]
struct Cli {
    #[clap(short, long, global = true, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ListingArgs {
    #[clap(long)]
    address: String,
    #[clap(long)]
    rent: i64,
    #[clap(long)]
    bedrooms: i32,
    #[clap(long)]
    image_url: Option<String>,
}

impl From<ListingArgs> for ListingInput {
    fn from(args: ListingArgs) -> Self {
        ListingInput {
            address: args.address,
            rent: args.rent,
            bedrooms: args.bedrooms,
            image_url: args.image_url,
        }
    }
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Logout,
    /// All listings, oldest first
    List,
    Show {
        id: Uuid,
    },
    /// Listings owned by the logged-in user
    Mine,
    Create {
        #[clap(flatten)]
        listing: ListingArgs,
    },
    Update {
        id: Uuid,
        #[clap(flatten)]
        listing: ListingArgs,
    },
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut client = LodgeClient::connect(&args.server)?;

    match args.command {
        Command::Register { email, password } => {
            let user_id = client.register(&email, &password).await?;
            println!("Registered! User ID: {user_id}");
        }
        Command::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            println!("Logged in as {}", session.user_id);
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
        Command::List => {
            let listings = client.list_listings().await?;
            println!("Listings ({})", listings.len());
            for listing in listings {
                println!("- {listing}");
            }
        }
        Command::Show { id } => {
            let listing = client.get_listing(id).await?;
            println!("{listing}");
            println!("  owner: {}", listing.owner_id);
            println!("  updated: {}", listing.updated_at);
        }
        Command::Mine => {
            let listings = client.my_listings().await?;
            println!("Your listings ({})", listings.len());
            for listing in listings {
                println!("- {listing}");
            }
        }
        Command::Create { listing } => {
            let listing = client.create_listing(&listing.into()).await?;
            println!("Listing created! ID: {}", listing.id);
        }
        Command::Update { id, listing } => {
            let listing = client.update_listing(id, &listing.into()).await?;
            println!("Listing updated: {listing}");
        }
        Command::Delete { id } => {
            client.delete_listing(id).await?;
            println!("Listing deleted!");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_parses_listing_flags() {
        let cli = Cli::try_parse_from([
            "unilodge", "create", "--address", "1 Main St", "--rent", "500", "--bedrooms", "2",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://127.0.0.1:8080");
        let Command::Create { listing } = cli.command else {
            panic!("expected create");
        };
        let input: ListingInput = listing.into();
        assert_eq!(input.rent, 500);
        assert_eq!(input.image_url, None);
    }

    #[test]
    fn server_flag_is_accepted_after_the_subcommand() {
        let id = Uuid::new_v4().to_string();
        let cli =
            Cli::try_parse_from(["unilodge", "delete", id.as_str(), "--server", "http://h:1"]).unwrap();
        assert_eq!(cli.server, "http://h:1");
        assert!(matches!(cli.command, Command::Delete { .. }));
    }
}
