/// Vanilla `server.properties`: key, default, explanation.
pub(crate) const SERVER_PROPERTIES: &[(&str, &str, &str)] = &[
    ("accepts-transfers", "false", "If true, the server accepts player transfers from other servers via the transfer packet."),
    ("allow-flight", "false", "If false, players who appear to fly (without elytra/creative) may be kicked by the anti-cheat."),
    ("broadcast-console-to-ops", "true", "If true, console command output is sent to all online ops."),
    ("broadcast-rcon-to-ops", "true", "If true, RCON command output is sent to all online ops."),
    ("bug-report-link", "", "Custom URL shown in the bug report screen. Empty uses the default Mojang link."),
    ("difficulty", "easy", "Controls hostile mob damage and hunger drain. hard = mobs deal more damage, hunger can kill."),
    ("enable-code-of-conduct", "false", "If true, shows a code-of-conduct popup to players on first join."),
    ("enable-jmx-monitoring", "false", "Exposes JMX MBeans for monitoring server performance with external tools."),
    ("enable-query", "false", "Enables the GameSpy4 query protocol, letting external tools poll server info on query.port."),
    ("enable-rcon", "false", "Enables remote console access (RCON) for sending commands remotely."),
    ("enable-status", "true", "If true, the server responds to status pings in the multiplayer server list."),
    ("enforce-secure-profile", "true", "If true, players must have a Mojang-signed key pair. Breaks offline mode if enabled incorrectly."),
    ("enforce-whitelist", "false", "If true, players removed from whitelist while online are kicked immediately."),
    ("entity-broadcast-range-percentage", "100", "Percentage of default entity tracking range. Lower = entities disappear sooner, less bandwidth."),
    ("force-gamemode", "false", "If true, players are forced into the default gamemode every time they (re)join."),
    ("function-permission-level", "2", "Op level required to run commands inside data pack functions (1-4)."),
    ("gamemode", "survival", "Default game mode for new players: survival, creative, adventure, or spectator."),
    ("generate-structures", "true", "If true, villages, dungeons, temples, etc. generate in new chunks."),
    ("generator-settings", "{}", "JSON object for flat/custom world generation. Only used when level-type is flat or buffet."),
    ("hardcore", "false", "If true, players are banned on death and difficulty is locked to hard."),
    ("hide-online-players", "false", "If true, the player list in the server status response is hidden."),
    ("initial-disabled-packs", "", "Comma-separated list of data packs that are disabled by default on world creation."),
    ("initial-enabled-packs", "vanilla", "Comma-separated list of data packs enabled by default. 'vanilla' is always included."),
    ("level-name", "world", "Name of the world folder on disk."),
    ("level-seed", "", "World generation seed. Empty = random seed chosen at creation."),
    ("level-type", "minecraft\\:normal", "World type used for generation. minecraft:normal is the standard overworld generator."),
    ("log-ips", "true", "If true, player IP addresses are logged when they connect."),
    ("management-server-allowed-origins", "", "Comma-separated allowed origins for the management server HTTP endpoint."),
    ("management-server-enabled", "false", "Enables the internal management REST API used by some monitoring tools."),
    ("management-server-host", "localhost", "Hostname/IP that the management server binds to."),
    ("management-server-port", "0", "Port for the management REST API. 0 = auto-assign."),
    ("management-server-secret", "", "Shared secret for authenticating management server requests."),
    ("management-server-tls-enabled", "true", "If true, the management server uses TLS encryption."),
    ("management-server-tls-keystore", "", "Path to the TLS keystore file for the management server."),
    ("management-server-tls-keystore-password", "", "Password for the management server TLS keystore."),
    ("max-chained-neighbor-updates", "1000000", "Limits cascading block updates (e.g. redstone chains). Prevents lag from massive chain reactions."),
    ("max-players", "20", "Maximum number of players that can be connected simultaneously."),
    ("max-tick-time", "60000", "Milliseconds a single tick can take before the watchdog kills the server. -1 disables the watchdog."),
    ("max-world-size", "29999984", "Maximum world border radius in blocks. Limits how far players can travel."),
    ("motd", "A Minecraft Server", "Message of the day displayed in the multiplayer server list."),
    ("network-compression-threshold", "256", "Packets larger than this (bytes) are compressed. Higher = less CPU, slightly more bandwidth. -1 disables."),
    ("online-mode", "true", "If false, the server skips Mojang authentication. Required for offline/cracked clients (EasyAuth handles auth instead)."),
    ("op-permission-level", "4", "Default permission level granted to ops (1-4). 4 = full access including /stop."),
    ("pause-when-empty-seconds", "-1", "Seconds after the last player leaves before the server pauses ticking. -1 = never pause."),
    ("player-idle-timeout", "0", "Minutes of inactivity before a player is kicked. 0 = never kick idle players."),
    ("prevent-proxy-connections", "false", "If true, the server blocks connections from known VPN/proxy IPs using the Mojang API."),
    ("query.port", "25565", "Port used for the GameSpy4 query protocol (if enable-query is true)."),
    ("rate-limit", "0", "Maximum number of packets a client can send per second. 0 = no limit."),
    ("rcon.password", "", "Password required for RCON connections. Empty = RCON disabled even if enable-rcon is true."),
    ("rcon.port", "25575", "Port used for RCON remote console connections."),
    ("region-file-compression", "deflate", "Compression algorithm for region files. 'deflate' is standard; 'lz4' is faster but uses more disk."),
    ("require-resource-pack", "false", "If true, players who decline the server resource pack are disconnected."),
    ("resource-pack", "", "URL to a resource pack (.zip) that clients are prompted to download."),
    ("resource-pack-id", "", "UUID identifying the resource pack. Avoids re-downloading if the pack hasn't changed."),
    ("resource-pack-prompt", "", "Custom message shown when prompting the player to accept the resource pack."),
    ("resource-pack-sha1", "", "SHA-1 hash of the resource pack file. Used to verify download integrity."),
    ("server-ip", "", "IP address the server binds to. Empty = binds to all available interfaces (0.0.0.0)."),
    ("server-port", "25565", "The network port the server listens on for player connections."),
    ("simulation-distance", "10", "Chunk radius around each player that is actively ticked (mobs move, crops grow). Lower saves CPU."),
    ("spawn-protection", "16", "Block radius around world spawn where only ops can build/break. 0 disables protection."),
    ("status-heartbeat-interval", "0", "Overrides the heartbeat interval for the status endpoint. 0 uses the default."),
    ("sync-chunk-writes", "true", "If true, chunk writes are synchronous (safer but slower). false = async, risks corruption on crash."),
    ("text-filtering-config", "", "Path to a text filtering configuration file for chat message filtering."),
    ("text-filtering-version", "0", "Version of the text filtering protocol to use. 0 = default."),
    ("use-native-transport", "true", "If true, uses optimized Linux epoll for networking. Disable if you experience connection issues."),
    ("view-distance", "10", "Chunk radius the server sends to each player. Higher = more visible terrain, more bandwidth and memory."),
    ("white-list", "false", "If true, only players listed in whitelist.json can join the server."),
];

/// Properties whose values never reach the report.
pub(crate) const SECRET_PROPERTIES: &[&str] = &[
    "rcon.password",
    "management-server-secret",
    "management-server-tls-keystore-password",
];

/// Vanilla gamerules as stored in `level.dat`: key, default, explanation.
pub(crate) const GAMERULES: &[(&str, &str, &str)] = &[
    ("minecraft:advance_time", "1", "Whether in-game time of day advances."),
    ("minecraft:advance_weather", "1", "Whether weather patterns change over time."),
    ("minecraft:allow_entering_nether_using_portals", "1", "Whether players can use nether portals to travel between dimensions."),
    ("minecraft:block_drops", "1", "Whether blocks drop items when broken."),
    ("minecraft:block_explosion_drop_decay", "1", "Whether some block drops are destroyed by block-caused explosions (TNT)."),
    ("minecraft:command_block_output", "1", "Whether command blocks show their output in chat."),
    ("minecraft:command_blocks_work", "1", "Whether command blocks can execute commands."),
    ("minecraft:drowning_damage", "1", "Whether players and mobs take drowning damage."),
    ("minecraft:elytra_movement_check", "1", "Whether the server validates elytra flight speed to prevent cheating."),
    ("minecraft:ender_pearls_vanish_on_death", "1", "Whether thrown ender pearls disappear when the player dies."),
    ("minecraft:entity_drops", "1", "Whether entities (excluding blocks) drop items on death."),
    ("minecraft:fall_damage", "1", "Whether players and mobs take fall damage."),
    ("minecraft:fire_damage", "1", "Whether players and mobs take fire/lava damage."),
    ("minecraft:fire_spread_radius_around_player", "128", "Block radius around players within which fire can spread. 0 disables fire spread."),
    ("minecraft:forgive_dead_players", "1", "Whether angered neutral mobs stop being angry when the target player dies."),
    ("minecraft:freeze_damage", "1", "Whether players and mobs take freezing damage from powder snow."),
    ("minecraft:global_sound_events", "1", "Whether certain sounds (e.g. wither spawning) are heard globally."),
    ("minecraft:immediate_respawn", "0", "Whether players respawn instantly without the death screen."),
    ("minecraft:keep_inventory", "0", "Whether players keep their inventory and XP on death."),
    ("minecraft:lava_source_conversion", "0", "Whether lava can form source blocks (like water does)."),
    ("minecraft:limited_crafting", "0", "Whether players can only craft recipes they have unlocked."),
    ("minecraft:locator_bar", "1", "Whether the boss bar / locator bar displays at the top of the screen."),
    ("minecraft:log_admin_commands", "1", "Whether admin commands are logged to the server log."),
    ("minecraft:max_block_modifications", "32768", "Maximum number of block changes per tick from commands."),
    ("minecraft:max_command_forks", "65536", "Maximum number of command forks (e.g. /execute) allowed."),
    ("minecraft:max_command_sequence_length", "65536", "Maximum length of a command sequence that can execute in a single tick."),
    ("minecraft:max_entity_cramming", "24", "Maximum number of entities that can push into the same block before suffocation damage begins."),
    ("minecraft:max_snow_accumulation_height", "1", "Maximum layers of snow that can accumulate from snowfall."),
    ("minecraft:mob_drops", "1", "Whether mobs drop loot on death."),
    ("minecraft:mob_explosion_drop_decay", "1", "Whether some block drops are destroyed by mob-caused explosions (creepers, ghasts)."),
    ("minecraft:mob_griefing", "1", "Whether mobs can modify blocks (creeper explosions, endermen picking up blocks, etc.)."),
    ("minecraft:natural_health_regeneration", "1", "Whether players naturally regenerate health when their hunger bar is full."),
    ("minecraft:player_movement_check", "1", "Whether the server validates player movement to prevent cheating."),
    ("minecraft:players_nether_portal_creative_delay", "0", "Ticks a creative-mode player must stand in a nether portal before teleporting. 0 = instant."),
    ("minecraft:players_nether_portal_default_delay", "80", "Ticks a survival/adventure player must stand in a nether portal before teleporting."),
    ("minecraft:players_sleeping_percentage", "100", "Percentage of online players that must sleep to skip the night. 100 = all, 0 = one player suffices."),
    ("minecraft:projectiles_can_break_blocks", "1", "Whether projectiles (arrows, tridents) can break certain blocks like chorus flowers."),
    ("minecraft:pvp", "1", "Whether players can deal damage to other players."),
    ("minecraft:raids", "1", "Whether raids can spawn when a player with Bad Omen enters a village."),
    ("minecraft:random_tick_speed", "3", "Speed of random block ticks (crop growth, leaf decay, etc.). Default 3, higher = faster."),
    ("minecraft:reduced_debug_info", "0", "Whether the debug screen (F3) shows reduced information."),
    ("minecraft:respawn_radius", "10", "Block radius around the world spawn within which players randomly respawn."),
    ("minecraft:send_command_feedback", "1", "Whether command execution results are shown in chat."),
    ("minecraft:show_advancement_messages", "1", "Whether advancement completion messages are broadcast in chat."),
    ("minecraft:show_death_messages", "1", "Whether death messages are shown in chat."),
    ("minecraft:spawn_mobs", "1", "Whether passive/neutral mobs can spawn naturally."),
    ("minecraft:spawn_monsters", "1", "Whether hostile mobs can spawn naturally."),
    ("minecraft:spawn_patrols", "1", "Whether pillager patrols can spawn."),
    ("minecraft:spawn_phantoms", "1", "Whether phantoms can spawn for players who haven't slept."),
    ("minecraft:spawn_wandering_traders", "1", "Whether wandering traders can spawn naturally."),
    ("minecraft:spawn_wardens", "1", "Whether wardens can spawn when triggered by sculk shriekers."),
    ("minecraft:spawner_blocks_work", "1", "Whether mob spawner blocks can spawn entities."),
    ("minecraft:spectators_generate_chunks", "1", "Whether spectator-mode players cause chunk generation."),
    ("minecraft:spread_vines", "1", "Whether vines (and similar blocks) can spread to adjacent surfaces."),
    ("minecraft:tnt_explodes", "1", "Whether TNT blocks explode when ignited."),
    ("minecraft:tnt_explosion_drop_decay", "0", "Whether some block drops are destroyed by TNT explosions."),
    ("minecraft:universal_anger", "0", "Whether angered neutral mobs attack all nearby players, not just the one who provoked them."),
    ("minecraft:water_source_conversion", "1", "Whether water can form new source blocks when flowing between two existing sources."),
];
