use api_shared::{HealthService, InitiateUploadReq};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use upload_core::{CoreConfig, JsonFileStore, LocalFilesystem, UploadService};

#[derive(Parser)]
#[command(name = "upload")]
#[command(about = "Upload tracker CLI, working directly on the local record store")]
struct Cli {
    /// Directory upload targets are created in
    #[arg(long, env = "UPLOAD_DIR", global = true)]
    upload_dir: Option<String>,
    /// Directory holding the record collection
    #[arg(long, env = "UPLOAD_DATABASE_DIR", global = true)]
    database_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the CLI can reach its configuration
    Health,
    /// Announce an upload and print its public record
    Initiate {
        /// Original file name
        file_name: String,
        /// File extension (with or without a leading dot)
        #[arg(long)]
        ext: Option<String>,
    },
    /// Reconcile and print the public record of an upload
    Status {
        /// Upload id returned by `initiate`
        file_id: String,
    },
    /// Print the stored record of an upload, including its storage path
    Show {
        /// Upload id returned by `initiate`
        file_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'upload --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::from_values(cli.upload_dir, cli.database_dir)?);

    if let Commands::Health = command {
        let health = HealthService::check_health();
        println!("{} (uploads: {})", health.message, cfg.upload_dir().display());
        return Ok(());
    }

    cfg.ensure_dirs().await?;
    let store = JsonFileStore::open(cfg.database_dir()).await?;
    let service = UploadService::new(cfg, Arc::new(store), Arc::new(LocalFilesystem));

    match command {
        Commands::Health => {}
        Commands::Initiate { file_name, ext } => {
            let req = InitiateUploadReq {
                file_name: Some(file_name),
                file_ext: ext,
            };
            match service.initiate_upload(req).await {
                Ok(res) => println!("{}", serde_json::to_string_pretty(&res)?),
                Err(e) => eprintln!("Error initiating upload: {}", e),
            }
        }
        Commands::Status { file_id } => {
            match service.query_upload_status(Some(&file_id)).await {
                Ok(res) => println!("{}", serde_json::to_string_pretty(&res)?),
                Err(e) => eprintln!("Error querying upload {}: {}", file_id, e),
            }
        }
        Commands::Show { file_id } => match service.find_record(&file_id).await {
            Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            Err(e) => eprintln!("Error reading upload {}: {}", file_id, e),
        },
    }

    Ok(())
}
