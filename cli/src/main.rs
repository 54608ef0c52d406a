mod post;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use potluck_core::{
    AuthProvider, Category, ProfilePatch, ProfileStore, RecipeFilter, RecipeStore, RestBackend,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Potluck CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup { email: String, password: String },
    /// Sign in and persist the session
    Signin { email: String, password: String },
    /// Sign out and forget the session
    Signout,
    /// Request a password-reset email
    ResetPassword {
        email: String,
        /// Where the emailed reset link sends the user
        #[arg(long, default_value = "potluck://reset-password")]
        redirect_url: String,
    },
    /// List recipes, optionally filtered
    Recipes {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one recipe
    Show { id: Uuid },
    /// Submit a recipe from a JSON file
    Post {
        file: PathBuf,
        /// Attach this image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show the signed-in user's profile, or update the given fields
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let backend = Arc::new(RestBackend::from_env()?);
    if let Some(saved) = session::load() {
        backend.restore_session(saved);
    }

    match cli.command {
        Commands::Signup { email, password } => {
            let created = backend.sign_up(&email, &password).await?;
            if created.access_token.is_some() {
                session::save(&created)?;
                println!("Account created and signed in as {}", email);
            } else {
                println!("Account created; check {} for a confirmation email", email);
            }
        }
        Commands::Signin { email, password } => {
            let signed_in = backend.sign_in(&email, &password).await?;
            session::save(&signed_in)?;
            println!("Signed in as {}", email);
        }
        Commands::Signout => {
            backend.sign_out().await?;
            session::clear()?;
            println!("Signed out");
        }
        Commands::ResetPassword { email, redirect_url } => {
            backend.reset_password(&email, &redirect_url).await?;
            println!("Password reset email sent to {}", email);
        }
        Commands::Recipes { category, search } => {
            let category = match category.as_deref() {
                Some(name) => Some(
                    Category::from_str(name).with_context(|| format!("Unknown category {:?}", name))?,
                ),
                None => None,
            };
            let recipes = RecipeStore::list(backend.as_ref(), &RecipeFilter { category, search }).await?;
            if recipes.is_empty() {
                println!("No recipes found");
            }
            for recipe in recipes {
                let category = recipe
                    .category
                    .map(|c| format!(" [{}]", c))
                    .unwrap_or_default();
                println!("{}  {}{}", recipe.id, recipe.title, category);
                println!("    {}", recipe.description);
            }
        }
        Commands::Show { id } => {
            let recipe = RecipeStore::get(backend.as_ref(), id).await?;
            println!("{}", recipe.title);
            if let Some(category) = recipe.category {
                println!("Category: {}", category);
            }
            println!("\n{}\n", recipe.description);
            if let Some(url) = &recipe.image_url {
                println!("Image: {}\n", url);
            }
            println!("Ingredients:");
            for ingredient in &recipe.ingredients {
                println!("  - {} {} {}", ingredient.quantity, ingredient.unit, ingredient.name);
            }
            println!("\nSteps:");
            for (index, step) in recipe.steps.iter().enumerate() {
                println!("  {}. {}", index + 1, step);
            }
        }
        Commands::Post { file, image } => {
            post::post(backend, &file, image).await?;
        }
        Commands::Profile {
            username,
            website,
            avatar_url,
        } => {
            let user_id = backend
                .current_user_id()
                .await
                .context("Not signed in; run `potluck signin` first")?;

            let patch = ProfilePatch {
                username,
                website,
                avatar_url,
            };
            let has_updates =
                patch.username.is_some() || patch.website.is_some() || patch.avatar_url.is_some();
            if has_updates {
                ProfileStore::update(backend.as_ref(), user_id, &patch).await?;
                println!("Profile updated");
            }

            let profile = ProfileStore::get(backend.as_ref(), user_id).await?;
            println!("id:       {}", profile.id);
            println!("username: {}", profile.username.as_deref().unwrap_or("-"));
            println!("website:  {}", profile.website.as_deref().unwrap_or("-"));
            println!("avatar:   {}", profile.avatar_url.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}
